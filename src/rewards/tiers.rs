use serde::{Deserialize, Serialize};

/// Loyalty tiers in ascending order of transaction count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl LoyaltyTier {
    pub const ALL: [LoyaltyTier; 5] = [
        LoyaltyTier::Bronze,
        LoyaltyTier::Silver,
        LoyaltyTier::Gold,
        LoyaltyTier::Platinum,
        LoyaltyTier::Diamond,
    ];

    /// Transaction count at which the tier is earned
    pub fn threshold(&self) -> u64 {
        match self {
            LoyaltyTier::Bronze => 1,
            LoyaltyTier::Silver => 10,
            LoyaltyTier::Gold => 50,
            LoyaltyTier::Platinum => 100,
            LoyaltyTier::Diamond => 250,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "Bronze",
            LoyaltyTier::Silver => "Silver",
            LoyaltyTier::Gold => "Gold",
            LoyaltyTier::Platinum => "Platinum",
            LoyaltyTier::Diamond => "Diamond",
        }
    }

    /// The next tier above the given transaction count, if any remain.
    pub fn next_after(transaction_count: u64) -> Option<LoyaltyTier> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.threshold() > transaction_count)
    }
}
