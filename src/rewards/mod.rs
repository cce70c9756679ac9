//! Transaction-count rewards: loyalty tiers and randomized discount offers

mod engine;
mod tiers;

pub use engine::{
    record_transaction, record_transaction_with_rng, redeem_offer, rewards_summary, NextTier,
    RewardOutcome, RewardsSummary,
};
pub use tiers::LoyaltyTier;
