//! Append-only order book.
//!
//! Orders are stored in a `BTreeMap` keyed by their ID and are never
//! deleted: cancelled and filled orders stay addressable forever. The book
//! owns the monotonic order counter; IDs start at 1, increase by exactly one
//! per successful creation, and are never reused.

use std::collections::BTreeMap;

use chrono::Utc;
use custodex_types::{constants, AccountId, ExchangeError, Order, OrderId, OrderStatus, Result};
use rust_decimal::Decimal;

/// The engine's collection of orders plus the order counter.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, Order>,
    /// Number of orders ever created. The next order gets ID `counter + 1`.
    counter: u64,
}

impl OrderBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            counter: constants::FIRST_ORDER_ID - 1,
        }
    }

    /// Allocate the next ID and append a new open order, returning a copy
    /// of the appended order.
    ///
    /// Balance validation is the engine's job; the book only records the
    /// commitment.
    pub fn append(
        &mut self,
        maker: AccountId,
        asset_get: &str,
        amount_get: Decimal,
        asset_give: &str,
        amount_give: Decimal,
    ) -> Order {
        self.counter += 1;
        let id = OrderId(self.counter);
        let order = Order {
            id,
            maker,
            asset_get: asset_get.to_string(),
            amount_get,
            asset_give: asset_give.to_string(),
            amount_give,
            status: OrderStatus::Open,
            created_at: Utc::now(),
        };
        self.orders.insert(id, order.clone());
        order
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Look up an order that must exist and still be open.
    ///
    /// # Errors
    /// - `OrderNotFound` if the ID was never allocated
    /// - `InvalidOrderState` if the order is filled or cancelled
    pub fn open_order(&self, id: OrderId) -> Result<&Order> {
        let order = self.orders.get(&id).ok_or(ExchangeError::OrderNotFound(id))?;
        if !order.is_open() {
            return Err(ExchangeError::InvalidOrderState {
                id,
                status: order.status,
            });
        }
        Ok(order)
    }

    /// Cancel an open order on behalf of `caller`, returning a copy of the
    /// cancelled order.
    ///
    /// # Errors
    /// - `OrderNotFound` if the ID was never allocated
    /// - `InvalidOrderState` if the order is not open
    /// - `Unauthorized` if `caller` is not the maker
    pub fn cancel(&mut self, caller: AccountId, id: OrderId) -> Result<Order> {
        let order = self.orders.get_mut(&id).ok_or(ExchangeError::OrderNotFound(id))?;
        if !order.is_open() {
            return Err(ExchangeError::InvalidOrderState {
                id,
                status: order.status,
            });
        }
        if order.maker != caller {
            return Err(ExchangeError::Unauthorized(id));
        }
        order.status = OrderStatus::Cancelled;
        Ok(order.clone())
    }

    /// Transition an open order to filled, returning a copy of the filled
    /// order.
    ///
    /// # Errors
    /// Same existence/state guards as [`OrderBook::open_order`].
    pub fn mark_filled(&mut self, id: OrderId) -> Result<Order> {
        let order = self.orders.get_mut(&id).ok_or(ExchangeError::OrderNotFound(id))?;
        if !order.is_open() {
            return Err(ExchangeError::InvalidOrderState {
                id,
                status: order.status,
            });
        }
        order.status = OrderStatus::Filled;
        Ok(order.clone())
    }

    /// Number of orders ever created.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.counter
    }

    /// All orders in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten() -> Decimal {
        Decimal::new(10, 0)
    }

    #[test]
    fn append_allocates_sequential_ids() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let first = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;
        let second = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;
        assert_eq!(first, OrderId(1));
        assert_eq!(second, OrderId(2));
        assert_eq!(book.count(), 2);
    }

    #[test]
    fn appended_order_is_open_with_fields() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let order = book.append(maker, "mUSDC", ten(), "DAPP", Decimal::new(5, 0));
        assert_eq!(order.maker, maker);
        assert_eq!(order.asset_get, "mUSDC");
        assert_eq!(order.amount_get, ten());
        assert_eq!(order.asset_give, "DAPP");
        assert_eq!(order.amount_give, Decimal::new(5, 0));
        assert_eq!(order.status, OrderStatus::Open);
    }

    #[test]
    fn cancel_transitions_to_cancelled() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;

        let order = book.cancel(maker, id).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        // Still addressable afterwards
        assert_eq!(book.get(id).unwrap().status, OrderStatus::Cancelled);
    }

    #[test]
    fn cancel_by_non_maker_unauthorized() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;

        let err = book.cancel(AccountId::new(), id).unwrap_err();
        assert!(matches!(err, ExchangeError::Unauthorized(_)));
        assert!(book.get(id).unwrap().is_open());
    }

    #[test]
    fn double_cancel_fails_with_state_error() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;

        book.cancel(maker, id).unwrap();
        let err = book.cancel(maker, id).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::InvalidOrderState {
                status: OrderStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn cancel_missing_order_not_found() {
        let mut book = OrderBook::new();
        let err = book.cancel(AccountId::new(), OrderId(99)).unwrap_err();
        assert!(matches!(err, ExchangeError::OrderNotFound(OrderId(99))));
    }

    #[test]
    fn mark_filled_is_terminal() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;

        book.mark_filled(id).unwrap();
        let err = book.mark_filled(id).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::InvalidOrderState {
                status: OrderStatus::Filled,
                ..
            }
        ));
        // A filled order cannot be cancelled either
        let err = book.cancel(maker, id).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidOrderState { .. }));
    }

    #[test]
    fn counter_never_reused_after_cancel() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;
        book.cancel(maker, id).unwrap();

        let next = book.append(maker, "mUSDC", ten(), "DAPP", ten()).id;
        assert_eq!(next, OrderId(2));
        assert_eq!(book.count(), 2);
    }

    #[test]
    fn iter_yields_creation_order() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        for _ in 0..3 {
            book.append(maker, "mUSDC", ten(), "DAPP", ten());
        }
        let ids: Vec<u64> = book.iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
