//! One-off unlocks bought independently of a subscription.
//!
//! Unlocks are permanent. They are stored apart from the subscription so a
//! plan expiring never takes them away.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::EntitlementError;

/// Purchasable one-off unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockKind {
    /// Traditional template plus its download.
    UnlockTraditional,
    /// Download of the modern layout.
    UnlockModernDownload,
    /// Removes ads.
    AdFree,
}

impl UnlockKind {
    pub const ALL: [UnlockKind; 3] = [
        UnlockKind::UnlockTraditional,
        UnlockKind::UnlockModernDownload,
        UnlockKind::AdFree,
    ];

    /// Wire identifier used in checkout links.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockKind::UnlockTraditional => "unlock_traditional",
            UnlockKind::UnlockModernDownload => "unlock_modern_download",
            UnlockKind::AdFree => "ad_free",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UnlockKind::UnlockTraditional => "Traditional Template",
            UnlockKind::UnlockModernDownload => "Modern Download",
            UnlockKind::AdFree => "Ad-Free Experience",
        }
    }

    /// Price in whole rupees.
    pub fn price_inr(&self) -> u32 {
        match self {
            UnlockKind::UnlockTraditional => 10,
            UnlockKind::UnlockModernDownload => 5,
            UnlockKind::AdFree => 29,
        }
    }

    /// Price in paise.
    pub fn price_minor_units(&self) -> u64 {
        u64::from(self.price_inr()) * 100
    }
}

impl FromStr for UnlockKind {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unlock_traditional" => Ok(UnlockKind::UnlockTraditional),
            "unlock_modern_download" => Ok(UnlockKind::UnlockModernDownload),
            "ad_free" => Ok(UnlockKind::AdFree),
            other => Err(EntitlementError::UnknownUnlock(other.to_string())),
        }
    }
}

/// Permanent one-off grants owned by a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnlockedFeatures {
    pub traditional_template_unlocked: bool,
    pub modern_download_unlocked: bool,
    pub traditional_download_unlocked: bool,
    pub ad_free: bool,
}

impl UnlockedFeatures {
    /// The flags a single unlock purchase grants.
    pub fn for_kind(kind: UnlockKind) -> Self {
        match kind {
            UnlockKind::UnlockTraditional => Self {
                traditional_template_unlocked: true,
                traditional_download_unlocked: true,
                ..Self::default()
            },
            UnlockKind::UnlockModernDownload => Self {
                modern_download_unlocked: true,
                ..Self::default()
            },
            UnlockKind::AdFree => Self {
                ad_free: true,
                ..Self::default()
            },
        }
    }

    /// Set union. Never clears a flag.
    pub fn union(&self, other: &UnlockedFeatures) -> Self {
        Self {
            traditional_template_unlocked: self.traditional_template_unlocked
                || other.traditional_template_unlocked,
            modern_download_unlocked: self.modern_download_unlocked
                || other.modern_download_unlocked,
            traditional_download_unlocked: self.traditional_download_unlocked
                || other.traditional_download_unlocked,
            ad_free: self.ad_free || other.ad_free,
        }
    }

    /// True if every flag set in `other` is also set here.
    pub fn contains(&self, other: &UnlockedFeatures) -> bool {
        &self.union(other) == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traditional_unlock_grants_template_and_download() {
        let granted = UnlockedFeatures::for_kind(UnlockKind::UnlockTraditional);
        assert!(granted.traditional_template_unlocked);
        assert!(granted.traditional_download_unlocked);
        assert!(!granted.modern_download_unlocked);
    }

    #[test]
    fn modern_download_is_cheaper_than_traditional() {
        assert!(
            UnlockKind::UnlockModernDownload.price_inr() < UnlockKind::UnlockTraditional.price_inr()
        );
        assert_eq!(UnlockKind::UnlockTraditional.price_minor_units(), 1_000);
    }

    #[test]
    fn union_is_monotonic() {
        let a = UnlockedFeatures::for_kind(UnlockKind::AdFree);
        let b = UnlockedFeatures::for_kind(UnlockKind::UnlockModernDownload);
        let merged = a.union(&b);
        assert!(merged.contains(&a));
        assert!(merged.contains(&b));
        assert_eq!(merged.union(&UnlockedFeatures::default()), merged);
    }

    #[test]
    fn parses_checkout_actions() {
        for kind in UnlockKind::ALL {
            assert_eq!(kind.as_str().parse::<UnlockKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(matches!(
            "unlock_everything".parse::<UnlockKind>(),
            Err(EntitlementError::UnknownUnlock(_))
        ));
    }
}
