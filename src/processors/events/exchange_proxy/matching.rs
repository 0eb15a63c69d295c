//! The fill-matching core: decides which of a transaction's fills belong to
//! the swap currently being assembled.
//!
//! Every aggregator event narrows the transaction's fills to a window
//! bounded by the previous swap (below) and its own log position (above),
//! filters that window down to fills the aggregator can actually have
//! produced, and then looks for the requested token pair as either a single
//! fill or a contiguous multi-hop run. All functions here are pure reads
//! except [`assemble_swap`], which writes the new swap and advances the
//! transaction's boundary pointer.

use num_bigint::BigInt;
use tracing::warn;

use crate::config::NetworkConfig;
use crate::store::models::{Fill, Source, Swap, SwapMethod, Transaction};
use crate::store::SwapStore;
use crate::utils::Address;

/// Decode a packed Uniswap V3 route: `token(20) | fee(3) | token(20) | ...`.
///
/// Returns the token addresses in route order (first = input, last = output).
/// Anything shorter than two tokens and one fee field cannot describe a hop
/// and decodes to an empty route. Decoding is purely structural; the bytes
/// are not validated as plausible addresses.
pub fn decode_v3_token_path(encoded: &[u8]) -> Vec<Address> {
    if encoded.len() < 20 + 3 + 20 {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset + 20 <= encoded.len() {
        let token = Address::from_slice(&encoded[offset..offset + 20])
            .expect("window is exactly 20 bytes");
        tokens.push(token);
        offset += 23; // skip the token just read plus the fee field
    }
    tokens
}

/// Select the fills eligible for the swap currently being assembled.
///
/// The lower bound is the boundary swap's log position (exclusive) when the
/// transaction has one; the upper bound is inclusive when given. Fills with
/// no log position never participate. Insertion order is preserved, not
/// re-sorted.
pub fn select_fill_window<S: SwapStore>(
    store: &S,
    tx: &Transaction,
    upper_log_index: Option<u64>,
) -> Vec<Fill> {
    let lower_log_index = tx
        .last_swap
        .as_deref()
        .and_then(|id| store.load_swap(id))
        .and_then(|swap| swap.log_index);

    let mut fills = Vec::new();
    for fill_id in &tx.fills {
        let Some(fill) = store.load_fill(fill_id) else {
            continue;
        };
        let Some(log_index) = fill.log_index else {
            continue;
        };
        if let Some(lower) = lower_log_index {
            if log_index <= lower {
                continue;
            }
        }
        if let Some(upper) = upper_log_index {
            if log_index > upper {
                continue;
            }
        }
        fills.push(fill);
    }
    fills
}

/// Keep only fills attributable to one venue acting for the aggregator:
/// matching source tag and matching sender. Order-preserving.
pub fn filter_by_source_and_sender(fills: Vec<Fill>, source: &Source, sender: &Address) -> Vec<Fill> {
    fills
        .into_iter()
        .filter(|fill| fill.source == *source && fill.sender.as_ref() == Some(sender))
        .collect()
}

/// Fills attributable to a `transformERC20` swap: the flash wallet must be
/// the recipient, and when a sender is present it must be the exchange proxy
/// (native fills carry no sender).
pub fn find_transform_erc20_fills<S: SwapStore>(
    store: &S,
    tx: &Transaction,
    log_index: u64,
    network: &NetworkConfig,
) -> Vec<Fill> {
    let fills: Vec<Fill> = select_fill_window(store, tx, Some(log_index))
        .into_iter()
        .filter(|fill| {
            if fill.recipient != Some(network.flash_wallet) {
                return false;
            }
            match fill.sender {
                Some(sender) => sender == network.exchange_proxy,
                None => true,
            }
        })
        .collect();
    if fills.is_empty() {
        warn!("could not find transformERC20 fills for tx {}", tx.id);
    }
    fills
}

/// Fills attributable to a `sellToLiquidityProvider` swap. The provenance
/// rule is an exclusion: the fill must have a sender, and the sender must
/// not be the LP sandbox (the sandbox's own transfers are plumbing).
pub fn find_liquidity_provider_fills<S: SwapStore>(
    store: &S,
    tx: &Transaction,
    log_index: u64,
    network: &NetworkConfig,
) -> Vec<Fill> {
    let fills: Vec<Fill> = select_fill_window(store, tx, Some(log_index))
        .into_iter()
        .filter(|fill| {
            fill.source == Source::LiquidityProvider
                && fill.sender.is_some()
                && fill.sender != Some(network.sandbox)
        })
        .collect();
    if fills.is_empty() {
        warn!("could not find sellToLiquidityProvider fills for tx {}", tx.id);
    }
    fills
}

/// How a span was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    /// One fill exchanged exactly the requested pair.
    SingleFill,
    /// A contiguous run of fills covered the pair across hops.
    ContiguousSpan,
    /// Nothing matched; zero fills is a legitimate outcome for reverted
    /// calls, so this is a diagnostic, not an error.
    Unmatched,
}

#[derive(Debug, Clone)]
pub struct SpanMatch {
    pub fills: Vec<Fill>,
    pub quality: MatchQuality,
}

impl SpanMatch {
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

/// Match an ordered candidate list against a requested token pair.
///
/// A single fill exchanging exactly (input, output) wins over any multi-hop
/// interpretation. Failing that, the first candidate selling the input token
/// opens a span that closes at the first later candidate buying the output
/// token; everything in between is taken verbatim. This assumes one logical
/// swap's hops appear as an unbroken run in log order — a heuristic carried
/// over from the source behavior, not an on-chain guarantee.
///
/// Pure function of its inputs; no randomness, no tie-breaking.
pub fn match_fill_span(
    candidates: Vec<Fill>,
    input_token: &Address,
    output_token: &Address,
) -> SpanMatch {
    // Cheapest, least ambiguous case first: a single A->B fill.
    for fill in &candidates {
        if fill.input_token == *input_token && fill.output_token == *output_token {
            return SpanMatch {
                fills: vec![fill.clone()],
                quality: MatchQuality::SingleFill,
            };
        }
    }

    // No single fill. Maybe it's a multi-hop: find an A->X fill and a later
    // X'->B fill and grab everything in between.
    for i in 0..candidates.len() {
        if candidates[i].input_token != *input_token {
            continue;
        }
        for j in i..candidates.len() {
            if candidates[j].output_token == *output_token {
                return SpanMatch {
                    fills: candidates[i..=j].to_vec(),
                    quality: MatchQuality::ContiguousSpan,
                };
            }
        }
    }

    SpanMatch {
        fills: Vec::new(),
        quality: MatchQuality::Unmatched,
    }
}

/// Window, filter and match in one step: the pipeline every VIP call handler
/// runs against its requested pair.
pub fn find_vip_fills<S: SwapStore>(
    store: &S,
    tx: &Transaction,
    source: &Source,
    network: &NetworkConfig,
    input_token: &Address,
    output_token: &Address,
) -> SpanMatch {
    let window = select_fill_window(store, tx, None);
    let candidates = filter_by_source_and_sender(window, source, &network.exchange_proxy);
    let matched = match_fill_span(candidates, input_token, output_token);
    if matched.is_empty() {
        warn!(
            "could not find {} VIP fills for tx {} ({} -> {})",
            source, tx.id, input_token, output_token
        );
    }
    matched
}

/// Where a new swap sits in its transaction's ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapPosition {
    /// Event-driven swaps sit at their own log position.
    Event { log_index: u64 },
    /// Call-driven swaps have no log position; the call index only names
    /// them, so they do not tighten the next window's lower bound.
    Call { call_index: u32 },
}

/// Input/output volume contributions of one assembled swap, to be applied to
/// the token aggregates by the caller.
#[derive(Debug, Clone)]
pub struct SwapVolumes {
    pub input_token: Address,
    pub input_amount: BigInt,
    pub output_token: Address,
    pub output_amount: BigInt,
}

/// Build the swap record over a matched fill span and advance the
/// transaction's boundary pointer to it.
///
/// The span may be empty: the swap shell is still recorded so downstream
/// consumers can tell "attempted but unmatched" from "never attempted".
/// Aggregate state is not touched here; the returned [`SwapVolumes`] carry
/// the deltas for the caller to apply.
#[allow(clippy::too_many_arguments)]
pub fn assemble_swap<S: SwapStore>(
    store: &mut S,
    tx: &mut Transaction,
    method: SwapMethod,
    position: SwapPosition,
    fills: &[Fill],
    input_token: Address,
    output_token: Address,
    input_token_amount: BigInt,
    output_token_amount: BigInt,
    taker: Address,
    hint: Option<String>,
) -> (Swap, SwapVolumes) {
    let (id, log_index) = match position {
        SwapPosition::Event { log_index } => (Swap::event_id(&tx.id, log_index), Some(log_index)),
        SwapPosition::Call { call_index } => (Swap::call_id(&tx.id, call_index), None),
    };

    let swap = Swap {
        id,
        transaction: tx.id.clone(),
        block_number: tx.block_number,
        timestamp: tx.timestamp,
        log_index,
        method,
        fills: fills.iter().map(|fill| fill.id.clone()).collect(),
        input_token,
        output_token,
        input_token_amount: input_token_amount.clone(),
        output_token_amount: output_token_amount.clone(),
        taker,
        hint,
    };
    store.save_swap(swap.clone());

    tx.last_swap = Some(swap.id.clone());
    store.save_transaction(tx.clone());

    let volumes = SwapVolumes {
        input_token,
        input_amount: input_token_amount,
        output_token,
        output_amount: output_token_amount,
    };
    (swap, volumes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::timestamp_from_secs;
    use crate::store::InMemoryStore;

    fn addr(tail: u8) -> Address {
        let mut raw = [0u8; 20];
        raw[19] = tail;
        Address(raw)
    }

    fn test_fill(
        tx_id: &str,
        log_index: Option<u64>,
        source: Source,
        sender: Option<Address>,
        input_token: Address,
        output_token: Address,
    ) -> Fill {
        let disambiguator = log_index.map(|l| l.to_string()).unwrap_or_else(|| "x".to_string());
        Fill {
            id: format!("{tx_id}-{source}-{disambiguator}"),
            transaction: tx_id.to_string(),
            block_number: 1,
            timestamp: timestamp_from_secs(0),
            log_index,
            source,
            sender,
            recipient: None,
            provider: None,
            input_token,
            output_token,
            input_token_amount: BigInt::from(100),
            output_token_amount: BigInt::from(200),
        }
    }

    fn store_with_fills(tx: &mut Transaction, fills: Vec<Fill>) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for fill in fills {
            tx.fills.push(fill.id.clone());
            store.save_fill(fill);
        }
        store.save_transaction(tx.clone());
        store
    }

    // --- path decoder ---

    #[test]
    fn test_decode_path_single_hop() {
        // token(20) | fee(3) | token(20) = 43 bytes
        let mut encoded = vec![0u8; 43];
        encoded[..20].copy_from_slice(addr(0xaa).as_bytes());
        encoded[20..23].copy_from_slice(&[0x00, 0x0b, 0xb8]);
        encoded[23..43].copy_from_slice(addr(0xbb).as_bytes());

        let path = decode_v3_token_path(&encoded);
        assert_eq!(path, vec![addr(0xaa), addr(0xbb)]);
    }

    #[test]
    fn test_decode_path_too_short() {
        assert!(decode_v3_token_path(&[0u8; 42]).is_empty());
        assert!(decode_v3_token_path(&[]).is_empty());
        assert!(decode_v3_token_path(&[0u8; 20]).is_empty());
    }

    #[test]
    fn test_decode_path_multi_hop_lengths() {
        // 20 + k*23 bytes decodes to k+1 tokens
        for hops in 1usize..=4 {
            let len = 20 + hops * 23;
            let mut encoded = vec![0u8; len];
            for (hop, chunk) in encoded.chunks_mut(23).enumerate() {
                let n = 20.min(chunk.len());
                chunk[..n].fill(hop as u8 + 1);
            }
            let path = decode_v3_token_path(&encoded);
            assert_eq!(path.len(), hops + 1, "{len} bytes should yield {} tokens", hops + 1);
            assert_eq!(&path[0].as_bytes()[..], &encoded[..20]);
            assert_eq!(&path[hops].as_bytes()[..], &encoded[len - 20..]);
        }
    }

    #[test]
    fn test_decode_path_ignores_trailing_fee_garbage() {
        // 45 bytes: one full hop plus 2 stray bytes; the stray tail is
        // shorter than an address and is dropped.
        let encoded = vec![0u8; 45];
        assert_eq!(decode_v3_token_path(&encoded).len(), 2);
    }

    // --- window selector ---

    #[test]
    fn test_window_respects_boundary_swap() {
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", Some(5), Source::UniswapV3, None, addr(1), addr(2)),
            test_fill("0xtx", Some(12), Source::UniswapV3, None, addr(1), addr(2)),
            test_fill("0xtx", Some(15), Source::UniswapV3, None, addr(1), addr(2)),
        ];
        let mut store = store_with_fills(&mut tx, fills);

        // Boundary swap at log position 10
        let boundary = Swap {
            id: "0xtx-10".to_string(),
            transaction: "0xtx".to_string(),
            block_number: 1,
            timestamp: timestamp_from_secs(0),
            log_index: Some(10),
            method: SwapMethod::TransformErc20,
            fills: vec![],
            input_token: addr(1),
            output_token: addr(2),
            input_token_amount: BigInt::from(0),
            output_token_amount: BigInt::from(0),
            taker: addr(9),
            hint: None,
        };
        store.save_swap(boundary);
        tx.last_swap = Some("0xtx-10".to_string());
        store.save_transaction(tx.clone());

        let window = select_fill_window(&store, &tx, None);
        let positions: Vec<u64> = window.iter().filter_map(|f| f.log_index).collect();
        assert_eq!(positions, vec![12, 15], "only fills after the boundary survive");
    }

    #[test]
    fn test_window_lower_bound_is_exclusive() {
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", Some(10), Source::UniswapV3, None, addr(1), addr(2)),
            test_fill("0xtx", Some(11), Source::UniswapV3, None, addr(1), addr(2)),
        ];
        let mut store = store_with_fills(&mut tx, fills);

        let boundary = Swap {
            id: "0xtx-10".to_string(),
            transaction: "0xtx".to_string(),
            block_number: 1,
            timestamp: timestamp_from_secs(0),
            log_index: Some(10),
            method: SwapMethod::TransformErc20,
            fills: vec![],
            input_token: addr(1),
            output_token: addr(2),
            input_token_amount: BigInt::from(0),
            output_token_amount: BigInt::from(0),
            taker: addr(9),
            hint: None,
        };
        store.save_swap(boundary);
        tx.last_swap = Some("0xtx-10".to_string());
        store.save_transaction(tx.clone());

        let window = select_fill_window(&store, &tx, None);
        let positions: Vec<u64> = window.iter().filter_map(|f| f.log_index).collect();
        assert_eq!(positions, vec![11], "a fill at exactly the boundary is excluded");
    }

    #[test]
    fn test_window_upper_bound_is_inclusive() {
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", Some(3), Source::UniswapV2, None, addr(1), addr(2)),
            test_fill("0xtx", Some(7), Source::UniswapV2, None, addr(1), addr(2)),
            test_fill("0xtx", Some(8), Source::UniswapV2, None, addr(1), addr(2)),
        ];
        let store = store_with_fills(&mut tx, fills);

        let window = select_fill_window(&store, &tx, Some(7));
        let positions: Vec<u64> = window.iter().filter_map(|f| f.log_index).collect();
        assert_eq!(positions, vec![3, 7]);
    }

    #[test]
    fn test_window_skips_fills_without_log_position() {
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", None, Source::UniswapV2, None, addr(1), addr(2)),
            test_fill("0xtx", Some(4), Source::UniswapV2, None, addr(1), addr(2)),
        ];
        let store = store_with_fills(&mut tx, fills);

        let window = select_fill_window(&store, &tx, None);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].log_index, Some(4));
    }

    #[test]
    fn test_window_monotonic_after_new_boundary() {
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", Some(2), Source::UniswapV3, None, addr(1), addr(2)),
            test_fill("0xtx", Some(6), Source::UniswapV3, None, addr(1), addr(2)),
        ];
        let mut store = store_with_fills(&mut tx, fills.clone());

        let (_, _) = assemble_swap(
            &mut store,
            &mut tx,
            SwapMethod::TransformErc20,
            SwapPosition::Event { log_index: 4 },
            &fills[..1],
            addr(1),
            addr(2),
            BigInt::from(1),
            BigInt::from(1),
            addr(9),
            None,
        );

        let window = select_fill_window(&store, &tx, None);
        assert!(
            window.iter().all(|f| f.log_index.unwrap() > 4),
            "no fill at or below the new boundary may reappear"
        );
    }

    // --- candidate extractor ---

    #[test]
    fn test_filter_by_source_and_sender() {
        let proxy = addr(0xde);
        let fills = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, Some(proxy), addr(1), addr(2)),
            test_fill("0xtx", Some(2), Source::UniswapV3, Some(addr(0x99)), addr(1), addr(2)),
            test_fill("0xtx", Some(3), Source::Sushiswap, Some(proxy), addr(1), addr(2)),
            test_fill("0xtx", Some(4), Source::UniswapV3, None, addr(1), addr(2)),
        ];

        let kept = filter_by_source_and_sender(fills, &Source::UniswapV3, &proxy);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].log_index, Some(1));
    }

    // --- span matcher ---

    #[test]
    fn test_match_exact_single_hop() {
        let x = addr(1);
        let z = addr(3);
        let candidates = vec![test_fill("0xtx", Some(1), Source::UniswapV3, None, x, z)];

        let matched = match_fill_span(candidates, &x, &z);
        assert_eq!(matched.quality, MatchQuality::SingleFill);
        assert_eq!(matched.fills.len(), 1);
    }

    #[test]
    fn test_match_multi_hop_span() {
        let x = addr(1);
        let y = addr(2);
        let z = addr(3);
        let candidates = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, None, x, y),
            test_fill("0xtx", Some(2), Source::UniswapV3, None, y, z),
        ];

        let matched = match_fill_span(candidates, &x, &z);
        assert_eq!(matched.quality, MatchQuality::ContiguousSpan);
        assert_eq!(matched.fills.len(), 2);
        assert_eq!(matched.fills[0].input_token, x);
        assert_eq!(matched.fills[1].output_token, z);
    }

    #[test]
    fn test_match_prefers_single_hop_over_span() {
        let x = addr(1);
        let y = addr(2);
        let z = addr(3);
        // A valid A->X / X->B span exists, but so does a direct A->B fill
        let candidates = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, None, x, y),
            test_fill("0xtx", Some(2), Source::UniswapV3, None, y, z),
            test_fill("0xtx", Some(3), Source::UniswapV3, None, x, z),
        ];

        let matched = match_fill_span(candidates, &x, &z);
        assert_eq!(matched.quality, MatchQuality::SingleFill);
        assert_eq!(matched.fills[0].log_index, Some(3));
    }

    #[test]
    fn test_match_span_is_contiguous() {
        let x = addr(1);
        let y = addr(2);
        let z = addr(3);
        let unrelated = addr(7);
        let candidates = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, None, x, y),
            // An interleaved, unrelated fill still lands inside the span
            test_fill("0xtx", Some(2), Source::UniswapV3, None, unrelated, unrelated),
            test_fill("0xtx", Some(3), Source::UniswapV3, None, y, z),
        ];

        let matched = match_fill_span(candidates, &x, &z);
        assert_eq!(matched.quality, MatchQuality::ContiguousSpan);
        let positions: Vec<u64> = matched.fills.iter().filter_map(|f| f.log_index).collect();
        assert_eq!(positions, vec![1, 2, 3], "the span is taken verbatim, no gaps");
    }

    #[test]
    fn test_match_no_candidates_is_unmatched_not_error() {
        let matched = match_fill_span(Vec::new(), &addr(1), &addr(3));
        assert_eq!(matched.quality, MatchQuality::Unmatched);
        assert!(matched.fills.is_empty());
    }

    #[test]
    fn test_match_wrong_tokens_is_unmatched() {
        let candidates = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, None, addr(4), addr(5)),
            test_fill("0xtx", Some(2), Source::UniswapV3, None, addr(5), addr(6)),
        ];
        let matched = match_fill_span(candidates, &addr(1), &addr(3));
        assert_eq!(matched.quality, MatchQuality::Unmatched);
        assert!(matched.fills.is_empty());
    }

    #[test]
    fn test_match_is_deterministic() {
        let x = addr(1);
        let y = addr(2);
        let z = addr(3);
        let candidates = vec![
            test_fill("0xtx", Some(1), Source::UniswapV3, None, x, y),
            test_fill("0xtx", Some(2), Source::UniswapV3, None, y, z),
        ];

        let first = match_fill_span(candidates.clone(), &x, &z);
        let second = match_fill_span(candidates, &x, &z);
        assert_eq!(first.quality, second.quality);
        let ids =
            |m: &SpanMatch| m.fills.iter().map(|f| f.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    // --- assembler ---

    #[test]
    fn test_assemble_swap_advances_boundary() {
        let mut store = InMemoryStore::new();
        let mut tx = Transaction::new("0xtx", 1, 0);
        store.save_transaction(tx.clone());

        let (swap, volumes) = assemble_swap(
            &mut store,
            &mut tx,
            SwapMethod::TransformErc20,
            SwapPosition::Event { log_index: 9 },
            &[],
            addr(1),
            addr(2),
            BigInt::from(1000),
            BigInt::from(2000),
            addr(9),
            None,
        );

        assert_eq!(swap.id, "0xtx-9");
        assert_eq!(swap.log_index, Some(9));
        assert!(swap.fills.is_empty(), "unmatched swap shells keep zero fills");
        assert_eq!(volumes.input_amount, BigInt::from(1000));

        let stored_tx = store.load_transaction("0xtx").unwrap();
        assert_eq!(stored_tx.last_swap.as_deref(), Some("0xtx-9"));
        assert!(store.load_swap("0xtx-9").is_some());
    }

    #[test]
    fn test_assemble_call_swap_has_no_log_position() {
        let mut store = InMemoryStore::new();
        let mut tx = Transaction::new("0xtx", 1, 0);
        store.save_transaction(tx.clone());

        let (swap, _) = assemble_swap(
            &mut store,
            &mut tx,
            SwapMethod::UniswapVip,
            SwapPosition::Call { call_index: 3 },
            &[],
            addr(1),
            addr(2),
            BigInt::from(1),
            BigInt::from(1),
            addr(9),
            Some("UniswapV2".to_string()),
        );

        assert_eq!(swap.id, "0xtx-call-3");
        assert_eq!(swap.log_index, None);
        // A call-driven boundary leaves the next window unbounded below
        let window = select_fill_window(&store, &tx, None);
        assert!(window.is_empty());
    }

    #[test]
    fn test_swap_fills_lie_within_bounds() {
        // Ordering invariant: every fill of a swap lies in
        // (previous boundary, swap position].
        let mut tx = Transaction::new("0xtx", 1, 0);
        let fills = vec![
            test_fill("0xtx", Some(2), Source::UniswapV3, None, addr(1), addr(2)),
            test_fill("0xtx", Some(5), Source::UniswapV3, None, addr(2), addr(3)),
            test_fill("0xtx", Some(9), Source::UniswapV3, None, addr(3), addr(4)),
        ];
        let mut store = store_with_fills(&mut tx, fills);

        // First swap at log 6: only fills at 2 and 5 qualify
        let window = select_fill_window(&store, &tx, Some(6));
        assert_eq!(window.len(), 2);
        let (first, _) = assemble_swap(
            &mut store,
            &mut tx,
            SwapMethod::TransformErc20,
            SwapPosition::Event { log_index: 6 },
            &window,
            addr(1),
            addr(3),
            BigInt::from(1),
            BigInt::from(1),
            addr(9),
            None,
        );

        // Second swap at log 12: only the fill at 9 is left
        let window = select_fill_window(&store, &tx, Some(12));
        let positions: Vec<u64> = window.iter().filter_map(|f| f.log_index).collect();
        assert_eq!(positions, vec![9]);
        let (second, _) = assemble_swap(
            &mut store,
            &mut tx,
            SwapMethod::TransformErc20,
            SwapPosition::Event { log_index: 12 },
            &window,
            addr(3),
            addr(4),
            BigInt::from(1),
            BigInt::from(1),
            addr(9),
            None,
        );

        assert_eq!(first.fills.len(), 2);
        assert_eq!(second.fills.len(), 1);
        assert_ne!(first.fills.last(), second.fills.first(), "no overlap across boundaries");
    }
}
