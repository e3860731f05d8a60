//! Seaport 1.5 events replayed by the indexer.

use alloy::sol;

use crate::registry::EventRegistry;

pub mod handlers;

/// Prefix of checkpoint keys owned by this consumer set.
pub const SOURCE: &str = "seaport";

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct SpentItem {
        uint8 itemType;
        address token;
        uint256 identifier;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ReceivedItem {
        uint8 itemType;
        address token;
        uint256 identifier;
        uint256 amount;
        address recipient;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct OfferItem {
        uint8 itemType;
        address token;
        uint256 identifierOrCriteria;
        uint256 startAmount;
        uint256 endAmount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ConsiderationItem {
        uint8 itemType;
        address token;
        uint256 identifierOrCriteria;
        uint256 startAmount;
        uint256 endAmount;
        address recipient;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct OrderParameters {
        address offerer;
        address zone;
        OfferItem[] offer;
        ConsiderationItem[] consideration;
        uint8 orderType;
        uint256 startTime;
        uint256 endTime;
        bytes32 zoneHash;
        uint256 salt;
        bytes32 conduitKey;
        uint256 totalOriginalConsiderationItems;
    }

    #[derive(Debug, PartialEq, Eq)]
    event CounterIncremented(uint256 newCounter, address indexed offerer);

    #[derive(Debug, PartialEq, Eq)]
    event OrderCancelled(bytes32 orderHash, address indexed offerer, address indexed zone);

    #[derive(Debug, PartialEq, Eq)]
    event OrderFulfilled(
        bytes32 orderHash,
        address indexed offerer,
        address indexed zone,
        address recipient,
        SpentItem[] offer,
        ReceivedItem[] consideration
    );

    #[derive(Debug, PartialEq, Eq)]
    event OrderValidated(bytes32 orderHash, OrderParameters orderParameters);

    #[derive(Debug, PartialEq, Eq)]
    event OrdersMatched(bytes32[] orderHashes);
}

/// Seaport consumers in the order every pass scans them.
pub fn registry() -> EventRegistry {
    let mut registry = EventRegistry::new();
    registry
        .register::<CounterIncremented>(handlers::counter_incremented)
        .register::<OrderCancelled>(handlers::order_cancelled)
        .register::<OrderFulfilled>(handlers::order_fulfilled)
        .register::<OrderValidated>(handlers::order_validated)
        .register::<OrdersMatched>(handlers::orders_matched);
    registry
}
