//! Upgrade shop
//!
//! Upgrades cost `current level * base cost` and are paid from banked
//! currency. Persisting the result is the caller's job (see `Session`).

use thiserror::Error;

use crate::persistence::{SaveData, Upgrades};

/// Purchasable upgrade lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Bullet damage, +20% per level
    Damage,
    /// Shots per interval, divides the fire interval
    FireRate,
    /// Movement speed, +10% per level
    Speed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [UpgradeKind::Damage, UpgradeKind::FireRate, UpgradeKind::Speed];

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Kinetic Driver",
            UpgradeKind::FireRate => "Cycle Accelerator",
            UpgradeKind::Speed => "Servo Motors",
        }
    }

    pub fn level(self, upgrades: &Upgrades) -> u32 {
        match self {
            UpgradeKind::Damage => upgrades.damage_level,
            UpgradeKind::FireRate => upgrades.fire_rate_level,
            UpgradeKind::Speed => upgrades.speed_level,
        }
    }

    fn level_mut(self, upgrades: &mut Upgrades) -> &mut u32 {
        match self {
            UpgradeKind::Damage => &mut upgrades.damage_level,
            UpgradeKind::FireRate => &mut upgrades.fire_rate_level,
            UpgradeKind::Speed => &mut upgrades.speed_level,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("upgrade costs {cost}, only {available} banked")]
    InsufficientFunds { cost: u64, available: u64 },
}

/// Price of the next level
pub fn upgrade_cost(level: u32, base_cost: u64) -> u64 {
    level as u64 * base_cost
}

/// Buy one level of `kind`, returning the new level.
///
/// On failure `save` is left untouched.
pub fn purchase(save: &mut SaveData, kind: UpgradeKind, base_cost: u64) -> Result<u32, PurchaseError> {
    let cost = upgrade_cost(kind.level(&save.upgrades), base_cost);
    if save.total_currency < cost {
        return Err(PurchaseError::InsufficientFunds {
            cost,
            available: save.total_currency,
        });
    }

    save.total_currency -= cost;
    let level = kind.level_mut(&mut save.upgrades);
    *level += 1;
    log::info!("Bought {} level {} for {}", kind.label(), *level, cost);
    Ok(*level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_with(currency: u64) -> SaveData {
        SaveData {
            total_currency: currency,
            upgrades: Upgrades::default(),
        }
    }

    #[test]
    fn test_cost_scales_with_level() {
        assert_eq!(upgrade_cost(1, 100), 100);
        assert_eq!(upgrade_cost(4, 100), 400);
    }

    #[test]
    fn test_exact_funds_succeed() {
        let mut save = save_with(100);
        assert_eq!(purchase(&mut save, UpgradeKind::Damage, 100), Ok(2));
        assert_eq!(save.total_currency, 0);
        assert_eq!(save.upgrades.damage_level, 2);
    }

    #[test]
    fn test_short_funds_fail_unchanged() {
        let mut save = save_with(99);
        let before = save.clone();
        assert_eq!(
            purchase(&mut save, UpgradeKind::Speed, 100),
            Err(PurchaseError::InsufficientFunds { cost: 100, available: 99 })
        );
        assert_eq!(save, before);
    }

    #[test]
    fn test_each_line_is_independent() {
        let mut save = save_with(1000);
        purchase(&mut save, UpgradeKind::FireRate, 100).unwrap();
        purchase(&mut save, UpgradeKind::FireRate, 100).unwrap();
        assert_eq!(save.upgrades.fire_rate_level, 3);
        assert_eq!(save.upgrades.damage_level, 1);
        assert_eq!(save.upgrades.speed_level, 1);
        // 100 + 200
        assert_eq!(save.total_currency, 700);
        for kind in UpgradeKind::ALL {
            assert!(kind.level(&save.upgrades) >= 1);
        }
    }
}
