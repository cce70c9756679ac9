/// Reward engine
///
/// Counts wallet-initiated transactions per address, mints tier badges when
/// counts cross thresholds, and rolls a 40% chance of a discount offer on
/// every recorded transaction.
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use super::tiers::LoyaltyTier;
use crate::aptos::normalize_address;
use crate::error::{StorageError, WalletError};
use crate::storage::{LoyaltyNft, OfferNft, Storage, UserStats};

const OFFER_PROBABILITY: f64 = 0.4;

struct OfferTemplate {
    title: &'static str,
    discount_percent: u8,
    validity_days: i64,
}

const OFFER_CATALOG: [OfferTemplate; 5] = [
    OfferTemplate {
        title: "10% off network fees on your next transfer",
        discount_percent: 10,
        validity_days: 30,
    },
    OfferTemplate {
        title: "5% cashback on token swaps",
        discount_percent: 5,
        validity_days: 7,
    },
    OfferTemplate {
        title: "15% off partner merchant checkout",
        discount_percent: 15,
        validity_days: 14,
    },
    OfferTemplate {
        title: "20% bonus on staking rewards",
        discount_percent: 20,
        validity_days: 30,
    },
    OfferTemplate {
        title: "25% off NFT marketplace fees",
        discount_percent: 25,
        validity_days: 21,
    },
];

/// What a single recorded transaction produced.
#[derive(Debug, Serialize)]
pub struct RewardOutcome {
    pub address: String,
    pub transaction_count: u64,
    pub loyalty_minted: Vec<LoyaltyNft>,
    pub offer_minted: Option<OfferNft>,
}

/// Full reward state for an address.
#[derive(Debug, Serialize)]
pub struct RewardsSummary {
    pub address: String,
    pub transaction_count: u64,
    pub next_tier: Option<NextTier>,
    pub loyalty_nfts: Vec<LoyaltyNft>,
    pub offer_nfts: Vec<OfferNft>,
}

#[derive(Debug, Serialize)]
pub struct NextTier {
    pub tier: LoyaltyTier,
    pub threshold: u64,
    pub transactions_remaining: u64,
}

/// Record one completed transaction for an address
pub fn record_transaction(storage: &Storage, address: &str) -> Result<RewardOutcome, WalletError> {
    record_transaction_with_rng(storage, address, &mut rand::thread_rng())
}

/// Record one completed transaction, rolling the offer chance on the given
/// RNG. Tier minting is idempotent: a tier already on the stats record is
/// never minted again, and every threshold the new count has crossed but the
/// record has not, is minted in the same call.
pub fn record_transaction_with_rng(
    storage: &Storage,
    address: &str,
    rng: &mut impl Rng,
) -> Result<RewardOutcome, WalletError> {
    let address = normalize_address(address)?;

    let mut stats = load_stats_or_default(storage, &address)?;
    stats.transaction_count += 1;

    let mut loyalty_minted = Vec::new();
    for tier in LoyaltyTier::ALL {
        if stats.transaction_count >= tier.threshold()
            && !stats.loyalty_nfts_minted.contains(&tier)
        {
            let nft = LoyaltyNft {
                id: Uuid::new_v4().to_string(),
                address: address.clone(),
                tier,
                transaction_count_at_mint: stats.transaction_count,
                minted_at: Utc::now(),
            };
            log::info!(
                "Minting {} loyalty NFT for {} at {} transactions",
                tier.name(),
                address,
                stats.transaction_count
            );
            stats.loyalty_nfts_minted.push(tier);
            loyalty_minted.push(nft);
        }
    }

    if !loyalty_minted.is_empty() {
        let mut all = load_loyalty_or_empty(storage, &address)?;
        all.extend(loyalty_minted.iter().cloned());
        storage.save_loyalty_nfts(&address, &all)?;
    }

    let offer_minted = if rng.gen_bool(OFFER_PROBABILITY) {
        let template = &OFFER_CATALOG[rng.gen_range(0..OFFER_CATALOG.len())];
        let now = Utc::now();
        let offer = OfferNft {
            id: Uuid::new_v4().to_string(),
            address: address.clone(),
            title: template.title.to_string(),
            discount_percent: template.discount_percent,
            expires_at: now + Duration::days(template.validity_days),
            minted_at: now,
            redeemed: false,
        };
        log::info!("Minted offer '{}' for {}", offer.title, address);

        let mut offers = load_offers_or_empty(storage, &address)?;
        offers.push(offer.clone());
        storage.save_offer_nfts(&address, &offers)?;
        Some(offer)
    } else {
        None
    };

    stats.updated_at = Utc::now();
    storage.save_user_stats(&stats)?;

    Ok(RewardOutcome {
        address,
        transaction_count: stats.transaction_count,
        loyalty_minted,
        offer_minted,
    })
}

/// Reward state for an address. Addresses that never transacted get a zeroed
/// summary rather than an error.
pub fn rewards_summary(storage: &Storage, address: &str) -> Result<RewardsSummary, WalletError> {
    let address = normalize_address(address)?;

    let stats = load_stats_or_default(storage, &address)?;
    let loyalty_nfts = load_loyalty_or_empty(storage, &address)?;
    let offer_nfts = load_offers_or_empty(storage, &address)?;

    let next_tier = LoyaltyTier::next_after(stats.transaction_count).map(|tier| NextTier {
        tier,
        threshold: tier.threshold(),
        transactions_remaining: tier.threshold() - stats.transaction_count,
    });

    Ok(RewardsSummary {
        address,
        transaction_count: stats.transaction_count,
        next_tier,
        loyalty_nfts,
        offer_nfts,
    })
}

/// Mark an offer as redeemed. Redeeming twice or after expiry is rejected.
pub fn redeem_offer(
    storage: &Storage,
    address: &str,
    offer_id: &str,
) -> Result<OfferNft, WalletError> {
    let address = normalize_address(address)?;

    let mut offers = load_offers_or_empty(storage, &address)?;
    let offer = offers
        .iter_mut()
        .find(|o| o.id == offer_id)
        .ok_or_else(|| WalletError::OfferNotFound(offer_id.to_string()))?;

    if offer.redeemed {
        return Err(WalletError::InvalidInput(format!(
            "Offer {} was already redeemed",
            offer_id
        )));
    }
    if offer.expires_at < Utc::now() {
        return Err(WalletError::InvalidInput(format!(
            "Offer {} has expired",
            offer_id
        )));
    }

    offer.redeemed = true;
    let redeemed = offer.clone();
    storage.save_offer_nfts(&address, &offers)?;

    log::info!("Offer '{}' redeemed by {}", redeemed.title, address);
    Ok(redeemed)
}

/// A stats document that fails to parse is reset rather than bricking the
/// reward path; IO failures still propagate.
fn load_stats_or_default(storage: &Storage, address: &str) -> Result<UserStats, WalletError> {
    match storage.load_user_stats(address) {
        Ok(Some(stats)) => Ok(stats),
        Ok(None) => Ok(UserStats::new(address)),
        Err(StorageError::Json(e)) => {
            log::warn!("User stats for {} are unreadable ({}), resetting", address, e);
            Ok(UserStats::new(address))
        }
        Err(e) => Err(e.into()),
    }
}

fn load_loyalty_or_empty(storage: &Storage, address: &str) -> Result<Vec<LoyaltyNft>, WalletError> {
    match storage.load_loyalty_nfts(address) {
        Ok(list) => Ok(list.unwrap_or_default()),
        Err(StorageError::Json(e)) => {
            log::warn!("Loyalty NFTs for {} are unreadable ({}), resetting", address, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn load_offers_or_empty(storage: &Storage, address: &str) -> Result<Vec<OfferNft>, WalletError> {
    match storage.load_offer_nfts(address) {
        Ok(list) => Ok(list.unwrap_or_default()),
        Err(StorageError::Json(e)) => {
            log::warn!("Offer NFTs for {} are unreadable ({}), resetting", address, e);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use tempfile::TempDir;

    const ADDR: &str = "0xd0c9428031378638ef16712d68b4b38a3ec46ee616df9fd6f8a80e5e5a9dc53f";

    fn temp_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        (dir, storage)
    }

    /// Constant u64::MAX fails every 40% Bernoulli roll.
    fn no_offer_rng() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// Constant 0 passes every 40% Bernoulli roll.
    fn always_offer_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_first_transaction_mints_bronze() {
        let (_dir, storage) = temp_storage();
        let outcome = record_transaction_with_rng(&storage, ADDR, &mut no_offer_rng()).unwrap();

        assert_eq!(outcome.transaction_count, 1);
        assert_eq!(outcome.loyalty_minted.len(), 1);
        assert_eq!(outcome.loyalty_minted[0].tier, LoyaltyTier::Bronze);
        assert_eq!(outcome.loyalty_minted[0].transaction_count_at_mint, 1);
        assert!(outcome.offer_minted.is_none());

        let stored = storage.load_loyalty_nfts(ADDR).unwrap().unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_silver_mints_at_ten_and_only_once() {
        let (_dir, storage) = temp_storage();
        let mut rng = no_offer_rng();

        for _ in 0..9 {
            record_transaction_with_rng(&storage, ADDR, &mut rng).unwrap();
        }
        let stats = storage.load_user_stats(ADDR).unwrap().unwrap();
        assert_eq!(stats.transaction_count, 9);
        assert_eq!(stats.loyalty_nfts_minted, vec![LoyaltyTier::Bronze]);

        let tenth = record_transaction_with_rng(&storage, ADDR, &mut rng).unwrap();
        assert_eq!(tenth.loyalty_minted.len(), 1);
        assert_eq!(tenth.loyalty_minted[0].tier, LoyaltyTier::Silver);

        let eleventh = record_transaction_with_rng(&storage, ADDR, &mut rng).unwrap();
        assert!(eleventh.loyalty_minted.is_empty());

        let stored = storage.load_loyalty_nfts(ADDR).unwrap().unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_crossed_thresholds_are_caught_up_in_one_call() {
        let (_dir, storage) = temp_storage();

        // a pre-existing count with no badges, as an imported data dir might have
        let mut stats = UserStats::new(ADDR);
        stats.transaction_count = 49;
        storage.save_user_stats(&stats).unwrap();

        let outcome = record_transaction_with_rng(&storage, ADDR, &mut no_offer_rng()).unwrap();
        assert_eq!(outcome.transaction_count, 50);
        let tiers: Vec<LoyaltyTier> = outcome.loyalty_minted.iter().map(|n| n.tier).collect();
        assert_eq!(
            tiers,
            vec![LoyaltyTier::Bronze, LoyaltyTier::Silver, LoyaltyTier::Gold]
        );
    }

    #[test]
    fn test_offer_minted_on_winning_roll() {
        let (_dir, storage) = temp_storage();
        let mut rng = always_offer_rng();

        for _ in 0..3 {
            let outcome = record_transaction_with_rng(&storage, ADDR, &mut rng).unwrap();
            let offer = outcome.offer_minted.unwrap();
            assert!(!offer.redeemed);
            assert!(offer.expires_at > offer.minted_at);
        }

        let offers = storage.load_offer_nfts(ADDR).unwrap().unwrap();
        assert_eq!(offers.len(), 3);
        assert_ne!(offers[0].id, offers[1].id);
    }

    #[test]
    fn test_no_offer_on_losing_roll() {
        let (_dir, storage) = temp_storage();
        let mut rng = no_offer_rng();

        for _ in 0..5 {
            let outcome = record_transaction_with_rng(&storage, ADDR, &mut rng).unwrap();
            assert!(outcome.offer_minted.is_none());
        }
        assert!(storage.load_offer_nfts(ADDR).unwrap().is_none());
    }

    #[test]
    fn test_offer_redeems_exactly_once() {
        let (_dir, storage) = temp_storage();
        let outcome =
            record_transaction_with_rng(&storage, ADDR, &mut always_offer_rng()).unwrap();
        let offer_id = outcome.offer_minted.unwrap().id;

        let redeemed = redeem_offer(&storage, ADDR, &offer_id).unwrap();
        assert!(redeemed.redeemed);

        let again = redeem_offer(&storage, ADDR, &offer_id);
        assert!(matches!(again, Err(WalletError::InvalidInput(_))));

        let missing = redeem_offer(&storage, ADDR, "no-such-offer");
        assert!(matches!(missing, Err(WalletError::OfferNotFound(_))));
    }

    #[test]
    fn test_expired_offer_cannot_be_redeemed() {
        let (_dir, storage) = temp_storage();
        let now = Utc::now();
        let expired = OfferNft {
            id: "stale-offer".to_string(),
            address: ADDR.to_string(),
            title: "10% off network fees on your next transfer".to_string(),
            discount_percent: 10,
            expires_at: now - Duration::days(1),
            minted_at: now - Duration::days(31),
            redeemed: false,
        };
        storage.save_offer_nfts(ADDR, &[expired]).unwrap();

        let result = redeem_offer(&storage, ADDR, "stale-offer");
        assert!(matches!(result, Err(WalletError::InvalidInput(_))));

        // still unredeemed on disk
        let offers = storage.load_offer_nfts(ADDR).unwrap().unwrap();
        assert!(!offers[0].redeemed);
    }

    #[test]
    fn test_summary_reports_next_tier() {
        let (_dir, storage) = temp_storage();

        let fresh = rewards_summary(&storage, ADDR).unwrap();
        assert_eq!(fresh.transaction_count, 0);
        let next = fresh.next_tier.unwrap();
        assert_eq!(next.tier, LoyaltyTier::Bronze);
        assert_eq!(next.transactions_remaining, 1);

        record_transaction_with_rng(&storage, ADDR, &mut no_offer_rng()).unwrap();
        let after_one = rewards_summary(&storage, ADDR).unwrap();
        let next = after_one.next_tier.unwrap();
        assert_eq!(next.tier, LoyaltyTier::Silver);
        assert_eq!(next.transactions_remaining, 9);
        assert_eq!(after_one.loyalty_nfts.len(), 1);
    }

    #[test]
    fn test_corrupt_stats_document_resets() {
        let (_dir, storage) = temp_storage();
        std::fs::create_dir_all(storage.base_dir()).unwrap();
        std::fs::write(
            storage.base_dir().join(format!("user_stats_{}.json", ADDR)),
            "{broken",
        )
        .unwrap();

        let outcome = record_transaction_with_rng(&storage, ADDR, &mut no_offer_rng()).unwrap();
        assert_eq!(outcome.transaction_count, 1);
    }
}
