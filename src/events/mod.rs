use ethnum::{I256, U256};
use minicbor::{Decode, Encode};

use crate::balances::types::AccountId;

/// The event describing a pool state transition.
#[derive(Clone, Debug, Encode, Decode, PartialEq, Eq)]
pub enum EventType {
    #[n(0)]
    Initialize {
        #[cbor(n(0), with = "crate::cbor::u256")]
        sqrt_price_x96: U256,
        #[n(1)]
        tick: i32,
    },
    #[n(1)]
    Mint {
        #[n(0)]
        sender: AccountId,
        #[n(1)]
        owner: AccountId,
        #[n(2)]
        bottom_tick: i32,
        #[n(3)]
        top_tick: i32,
        #[cbor(n(4), with = "crate::cbor::u128")]
        liquidity: u128,
        #[cbor(n(5), with = "crate::cbor::u256")]
        amount0: U256,
        #[cbor(n(6), with = "crate::cbor::u256")]
        amount1: U256,
    },
    #[n(2)]
    Burn {
        #[n(0)]
        owner: AccountId,
        #[n(1)]
        bottom_tick: i32,
        #[n(2)]
        top_tick: i32,
        #[cbor(n(3), with = "crate::cbor::u128")]
        liquidity: u128,
        #[cbor(n(4), with = "crate::cbor::u256")]
        amount0: U256,
        #[cbor(n(5), with = "crate::cbor::u256")]
        amount1: U256,
    },
    #[n(3)]
    Collect {
        #[n(0)]
        owner: AccountId,
        #[n(1)]
        recipient: AccountId,
        #[n(2)]
        bottom_tick: i32,
        #[n(3)]
        top_tick: i32,
        #[cbor(n(4), with = "crate::cbor::u128")]
        amount0: u128,
        #[cbor(n(5), with = "crate::cbor::u128")]
        amount1: u128,
    },
    #[n(4)]
    Swap {
        #[n(0)]
        sender: AccountId,
        #[n(1)]
        recipient: AccountId,
        #[cbor(n(2), with = "crate::cbor::i256")]
        amount0: I256,
        #[cbor(n(3), with = "crate::cbor::i256")]
        amount1: I256,
        #[cbor(n(4), with = "crate::cbor::u256")]
        sqrt_price_x96: U256,
        #[cbor(n(5), with = "crate::cbor::u128")]
        liquidity: u128,
        #[n(6)]
        tick: i32,
    },
    #[n(5)]
    Flash {
        #[n(0)]
        sender: AccountId,
        #[n(1)]
        recipient: AccountId,
        #[cbor(n(2), with = "crate::cbor::u256")]
        amount0: U256,
        #[cbor(n(3), with = "crate::cbor::u256")]
        amount1: U256,
        #[cbor(n(4), with = "crate::cbor::u256")]
        paid0: U256,
        #[cbor(n(5), with = "crate::cbor::u256")]
        paid1: U256,
    },
    #[n(6)]
    Fee {
        #[n(0)]
        fee: u16,
    },
    #[n(7)]
    CommunityFee {
        #[n(0)]
        community_fee: u16,
    },
    #[n(8)]
    TickSpacing {
        #[n(0)]
        tick_spacing: i32,
    },
    #[n(9)]
    Plugin {
        #[n(0)]
        plugin: Option<AccountId>,
    },
    #[n(10)]
    PluginConfig {
        #[n(0)]
        plugin_config: u8,
    },
    /// Tokens sent to the pool outside of any operation.
    #[n(11)]
    Donation {
        #[cbor(n(0), with = "crate::cbor::u256")]
        amount0: U256,
        #[cbor(n(1), with = "crate::cbor::u256")]
        amount1: U256,
    },
    #[n(12)]
    CommunityFeeCollected {
        #[n(0)]
        recipient: AccountId,
        #[cbor(n(1), with = "crate::cbor::u128")]
        amount0: u128,
        #[cbor(n(2), with = "crate::cbor::u128")]
        amount1: u128,
    },
}

#[derive(Clone, Encode, Decode, Debug, PartialEq, Eq)]
pub struct Event {
    /// Position of the event in the pool's log.
    #[n(0)]
    pub index: u64,
    #[n(1)]
    pub payload: EventType,
}

/// Append only log of pool events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn record(&mut self, payload: EventType) {
        let index = self.events.len() as u64;
        self.events.push(Event { index, payload });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&EventType> {
        self.events.last().map(|event| &event.payload)
    }

    /// Drops every event from `len` on. Used to discard the events of an
    /// aborted operation.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    /// CBOR encoding of the events starting at `from`, for an external sink.
    pub fn encode_from(&self, from: usize) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .skip(from)
            .filter_map(|event| minicbor::to_vec(event).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_insertion_order() {
        let mut log = EventLog::default();
        log.record(EventType::Fee { fee: 500 });
        log.record(EventType::TickSpacing { tick_spacing: 10 });
        assert_eq!(log.len(), 2);
        assert_eq!(log.as_slice()[1].index, 1);
        assert_eq!(log.last(), Some(&EventType::TickSpacing { tick_spacing: 10 }));

        log.truncate(1);
        log.record(EventType::CommunityFee { community_fee: 100 });
        assert_eq!(log.as_slice()[1].index, 1);
    }

    #[test]
    fn events_decode_to_what_was_recorded() {
        let mut log = EventLog::default();
        log.record(EventType::Swap {
            sender: AccountId::new([1; 20]),
            recipient: AccountId::new([2; 20]),
            amount0: I256::new(1_000),
            amount1: I256::new(-997),
            sqrt_price_x96: U256::ONE << 96,
            liquidity: 1 << 100,
            tick: -3,
        });
        log.record(EventType::Plugin { plugin: None });

        let encoded = log.encode_from(0);
        assert_eq!(encoded.len(), 2);
        for (bytes, event) in encoded.iter().zip(log.as_slice()) {
            let decoded: Event = minicbor::decode(bytes).unwrap();
            assert_eq!(&decoded, event);
        }
        assert_eq!(log.encode_from(1).len(), 1);
    }
}
