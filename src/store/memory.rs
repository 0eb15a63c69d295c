use ahash::AHashMap;
use std::fmt;

use super::models::{
    Erc1155OrderFill, Erc721OrderFill, Fill, Maker, NativeOrderFill, NftToken, Swap, Taker, Token,
    Transaction,
};
use super::SwapStore;
use crate::utils::Address;

/// Hash-map-backed [`SwapStore`]. One map per entity kind, keyed by the
/// entity id; saves overwrite, matching load-mutate-save usage.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    transactions: AHashMap<String, Transaction>,
    fills: AHashMap<String, Fill>,
    swaps: AHashMap<String, Swap>,
    tokens: AHashMap<Address, Token>,
    takers: AHashMap<Address, Taker>,
    makers: AHashMap<Address, Maker>,
    nft_tokens: AHashMap<String, NftToken>,
    native_order_fills: AHashMap<String, NativeOrderFill>,
    erc721_order_fills: AHashMap<String, Erc721OrderFill>,
    erc1155_order_fills: AHashMap<String, Erc1155OrderFill>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            transactions: self.transactions.len(),
            fills: self.fills.len(),
            swaps: self.swaps.len(),
            tokens: self.tokens.len(),
            native_order_fills: self.native_order_fills.len(),
            nft_order_fills: self.erc721_order_fills.len() + self.erc1155_order_fills.len(),
        }
    }
}

/// Record counts for run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub transactions: usize,
    pub fills: usize,
    pub swaps: usize,
    pub tokens: usize,
    pub native_order_fills: usize,
    pub nft_order_fills: usize,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} transactions, {} fills, {} swaps, {} tokens, {} native order fills, {} NFT order fills",
            self.transactions,
            self.fills,
            self.swaps,
            self.tokens,
            self.native_order_fills,
            self.nft_order_fills
        )
    }
}

impl SwapStore for InMemoryStore {
    fn load_transaction(&self, id: &str) -> Option<Transaction> {
        self.transactions.get(id).cloned()
    }

    fn save_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.id.clone(), transaction);
    }

    fn load_fill(&self, id: &str) -> Option<Fill> {
        self.fills.get(id).cloned()
    }

    fn save_fill(&mut self, fill: Fill) {
        self.fills.insert(fill.id.clone(), fill);
    }

    fn load_swap(&self, id: &str) -> Option<Swap> {
        self.swaps.get(id).cloned()
    }

    fn save_swap(&mut self, swap: Swap) {
        self.swaps.insert(swap.id.clone(), swap);
    }

    fn load_token(&self, id: &Address) -> Option<Token> {
        self.tokens.get(id).cloned()
    }

    fn save_token(&mut self, token: Token) {
        self.tokens.insert(token.id, token);
    }

    fn load_taker(&self, id: &Address) -> Option<Taker> {
        self.takers.get(id).cloned()
    }

    fn save_taker(&mut self, taker: Taker) {
        self.takers.insert(taker.id, taker);
    }

    fn load_maker(&self, id: &Address) -> Option<Maker> {
        self.makers.get(id).cloned()
    }

    fn save_maker(&mut self, maker: Maker) {
        self.makers.insert(maker.id, maker);
    }

    fn load_nft_token(&self, id: &str) -> Option<NftToken> {
        self.nft_tokens.get(id).cloned()
    }

    fn save_nft_token(&mut self, token: NftToken) {
        self.nft_tokens.insert(token.id.clone(), token);
    }

    fn load_native_order_fill(&self, id: &str) -> Option<NativeOrderFill> {
        self.native_order_fills.get(id).cloned()
    }

    fn save_native_order_fill(&mut self, fill: NativeOrderFill) {
        self.native_order_fills.insert(fill.id.clone(), fill);
    }

    fn load_erc721_order_fill(&self, id: &str) -> Option<Erc721OrderFill> {
        self.erc721_order_fills.get(id).cloned()
    }

    fn save_erc721_order_fill(&mut self, fill: Erc721OrderFill) {
        self.erc721_order_fills.insert(fill.id.clone(), fill);
    }

    fn load_erc1155_order_fill(&self, id: &str) -> Option<Erc1155OrderFill> {
        self.erc1155_order_fills.get(id).cloned()
    }

    fn save_erc1155_order_fill(&mut self, fill: Erc1155OrderFill) {
        self.erc1155_order_fills.insert(fill.id.clone(), fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_transaction_find_or_create() {
        let mut store = InMemoryStore::new();

        let (tx, created) = store.transaction_find_or_create("0xabc", 100, 1_700_000_000);
        assert!(created, "first lookup should insert");
        assert_eq!(tx.block_number, 100);
        assert!(tx.fills.is_empty());
        assert!(tx.last_swap.is_none());

        let (again, created) = store.transaction_find_or_create("0xabc", 999, 0);
        assert!(!created, "second lookup should find the existing record");
        assert_eq!(again.block_number, 100, "existing record wins over new context");
    }

    #[test]
    fn test_save_overwrites_by_id() {
        let mut store = InMemoryStore::new();
        let addr: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();

        let (mut token, _) = store.token_find_or_create(addr);
        token.swap_volume += BigInt::from(500);
        store.save_token(token);

        let (reloaded, created) = store.token_find_or_create(addr);
        assert!(!created);
        assert_eq!(reloaded.swap_volume, BigInt::from(500));
    }

    #[test]
    fn test_nft_token_id_includes_token_id() {
        let mut store = InMemoryStore::new();
        let addr: Address = "0x2222222222222222222222222222222222222222".parse().unwrap();

        let (a, _) = store.nft_token_find_or_create(addr, &BigInt::from(1), false);
        let (b, _) = store.nft_token_find_or_create(addr, &BigInt::from(2), false);
        assert_ne!(a.id, b.id, "distinct token ids must produce distinct records");
    }

    #[test]
    fn test_stats_counts() {
        let mut store = InMemoryStore::new();
        store.transaction_find_or_create("0x1", 1, 0);
        store.transaction_find_or_create("0x2", 2, 0);
        let stats = store.stats();
        assert_eq!(stats.transactions, 2);
        assert_eq!(stats.fills, 0);
    }
}
