// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Record Store
//!
//! This module provides the addressable, mutable store of entity records the
//! matching engine operates on.
//!
//! ## Architecture
//!
//! The engine never talks to a database directly: every handler works against
//! the [`SwapStore`] trait, which exposes load/save access keyed by entity id
//! plus the find-or-create idiom used at every record creation point. The
//! bundled [`memory::InMemoryStore`] is the only implementation in this
//! repository; anything that can address records by id (a database, a
//! key-value file) can stand in behind the same trait.
//!
//! ## Entities
//!
//! - `Transaction`: per-transaction fill list and swap boundary pointer
//! - `Fill` / `Swap`: the low-level and aggregator-level exchange records
//! - `NativeOrderFill`, `Erc721OrderFill`, `Erc1155OrderFill`: self-contained
//!   order fills outside the matching window
//! - `Token`, `Taker`, `Maker`, `NftToken`: aggregate-bearing participants

/// Entity record definitions and tag enums
pub mod models;

/// In-memory store implementation backed by hash maps
pub mod memory;

pub use memory::InMemoryStore;

use num_bigint::BigInt;

use crate::utils::Address;
use models::{
    Erc1155OrderFill, Erc721OrderFill, Fill, Maker, NativeOrderFill, NftToken, Swap, Taker, Token,
    Transaction,
};

/// Load/save access to the engine's records.
///
/// The provided `*_find_or_create` methods implement the creation discipline:
/// look the record up by id first and only insert when absent, reporting
/// through the second tuple element whether an insert happened. Replayed
/// deliveries are expected to be guarded at creation points with these
/// methods (or an explicit `load_*` probe) rather than inside the matching
/// logic.
pub trait SwapStore {
    fn load_transaction(&self, id: &str) -> Option<Transaction>;
    fn save_transaction(&mut self, transaction: Transaction);

    fn load_fill(&self, id: &str) -> Option<Fill>;
    fn save_fill(&mut self, fill: Fill);

    fn load_swap(&self, id: &str) -> Option<Swap>;
    fn save_swap(&mut self, swap: Swap);

    fn load_token(&self, id: &Address) -> Option<Token>;
    fn save_token(&mut self, token: Token);

    fn load_taker(&self, id: &Address) -> Option<Taker>;
    fn save_taker(&mut self, taker: Taker);

    fn load_maker(&self, id: &Address) -> Option<Maker>;
    fn save_maker(&mut self, maker: Maker);

    fn load_nft_token(&self, id: &str) -> Option<NftToken>;
    fn save_nft_token(&mut self, token: NftToken);

    fn load_native_order_fill(&self, id: &str) -> Option<NativeOrderFill>;
    fn save_native_order_fill(&mut self, fill: NativeOrderFill);

    fn load_erc721_order_fill(&self, id: &str) -> Option<Erc721OrderFill>;
    fn save_erc721_order_fill(&mut self, fill: Erc721OrderFill);

    fn load_erc1155_order_fill(&self, id: &str) -> Option<Erc1155OrderFill>;
    fn save_erc1155_order_fill(&mut self, fill: Erc1155OrderFill);

    fn transaction_find_or_create(
        &mut self,
        hash: &str,
        block_number: u64,
        timestamp_secs: i64,
    ) -> (Transaction, bool) {
        if let Some(tx) = self.load_transaction(hash) {
            return (tx, false);
        }
        let tx = Transaction::new(hash, block_number, timestamp_secs);
        self.save_transaction(tx.clone());
        (tx, true)
    }

    fn token_find_or_create(&mut self, address: Address) -> (Token, bool) {
        if let Some(token) = self.load_token(&address) {
            return (token, false);
        }
        let token = Token::new(address);
        self.save_token(token.clone());
        (token, true)
    }

    fn taker_find_or_create(&mut self, address: Address) -> (Taker, bool) {
        if let Some(taker) = self.load_taker(&address) {
            return (taker, false);
        }
        let taker = Taker::new(address);
        self.save_taker(taker.clone());
        (taker, true)
    }

    fn maker_find_or_create(&mut self, address: Address) -> (Maker, bool) {
        if let Some(maker) = self.load_maker(&address) {
            return (maker, false);
        }
        let maker = Maker::new(address);
        self.save_maker(maker.clone());
        (maker, true)
    }

    fn nft_token_find_or_create(
        &mut self,
        address: Address,
        token_id: &BigInt,
        is_erc1155: bool,
    ) -> (NftToken, bool) {
        let id = NftToken::make_id(address, token_id);
        if let Some(token) = self.load_nft_token(&id) {
            return (token, false);
        }
        let token = NftToken {
            id,
            address,
            token_id: token_id.clone(),
            is_erc1155,
        };
        self.save_nft_token(token.clone());
        (token, true)
    }
}
