// combat.rs

// Pure functions of buck attributes and oracle words: a fight always
// resolves the same way once its randomness is known.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::constants::{
    CRIT_CHANCE_PER_LEVEL, RANDOM_WORDS, SPECIAL_ABILITY_BONUS, SPECIAL_ABILITY_CHANCE, STYLE_BONUS,
};
use crate::state::{Buck, FightingStyle};

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StyleOutcome {
    AttackerWins,
    DefenderWins,
    Draw,
}

/// Matchup between two styles.
///
/// # Formula
///
/// ```text
/// (attack - defend) mod 3
///   0 => draw
///   1 => attacker wins   (1 beats 3, 2 beats 1, 3 beats 2)
///   2 => defender wins
/// ```
pub fn style_outcome(attack: FightingStyle, defend: FightingStyle) -> StyleOutcome {
    let diff = (3 + attack.index() - defend.index()) % 3;
    match diff {
        1 => StyleOutcome::AttackerWins,
        2 => StyleOutcome::DefenderWins,
        _ => StyleOutcome::Draw,
    }
}

/// Bonus earned by `attack` against `defend`; zero unless `attack` wins the matchup.
pub fn style_bonus(attack: FightingStyle, defend: FightingStyle) -> u64 {
    match style_outcome(attack, defend) {
        StyleOutcome::AttackerWins => STYLE_BONUS,
        _ => 0,
    }
}

/// Combat strength of a buck for one fight.
///
/// # Formula
///
/// ```text
/// (random_word mod points^4) + level * 10 + strength * 5 + intelligence * 3
/// ```
///
/// A buck with zero points gets no random component.
pub fn power_level(points: u32, random_word: u64, level: u8, strength: u8, intelligence: u8) -> u64 {
    let modulus = u64::from(points).saturating_pow(4).max(1);
    let random_part = random_word % modulus;

    random_part
        .saturating_add(u64::from(level) * 10)
        .saturating_add(u64::from(strength) * 5)
        .saturating_add(u64::from(intelligence) * 3)
}

/// Five percent crit chance per level; level 20 and above always crits.
pub fn is_critical_hit(level: u8, random_word: u64) -> bool {
    random_word % 100 < u64::from(level) * CRIT_CHANCE_PER_LEVEL
}

pub fn special_ability_activates(has_special_ability: bool, random_word: u64) -> bool {
    has_special_ability && random_word % 100 < SPECIAL_ABILITY_CHANCE
}

/// Oracle words assigned to each roll of a fight.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FightRolls {
    pub attacker_power: u64,
    pub defender_power: u64,
    pub attacker_crit: u64,
    pub defender_crit: u64,
    pub attacker_special: u64,
    pub defender_special: u64,
}

impl FightRolls {
    pub fn from_words(words: &[u64; RANDOM_WORDS]) -> Self {
        FightRolls {
            attacker_power: words[0],
            defender_power: words[1],
            attacker_crit: words[2],
            defender_crit: words[3],
            attacker_special: words[4],
            defender_special: words[5],
        }
    }
}

/// One side's adjusted strength and the rolls that shaped it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SideReport {
    pub power: u64,
    pub critical_hit: bool,
    pub special_ability: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CombatReport {
    pub outcome: StyleOutcome,
    pub attacker: SideReport,
    pub defender: SideReport,
}

fn side_power(
    buck: &Buck,
    opponent: &Buck,
    power_word: u64,
    crit_word: u64,
    special_word: u64,
) -> SideReport {
    let genetics = &buck.genetics;
    let mut power = power_level(
        buck.points,
        power_word,
        genetics.level,
        genetics.strength,
        genetics.intelligence,
    )
    .saturating_add(style_bonus(buck.fighting_style, opponent.fighting_style));

    let critical_hit = is_critical_hit(genetics.level, crit_word);
    if critical_hit {
        power = power.saturating_mul(3) / 2;
    }

    let special_ability = special_ability_activates(genetics.special_ability, special_word);
    if special_ability {
        power = power.saturating_add(SPECIAL_ABILITY_BONUS);
    }

    SideReport {
        power,
        critical_hit,
        special_ability,
    }
}

/// Decides a fight. Strictly greater adjusted power wins; equal power is a draw.
pub fn resolve(attacker: &Buck, defender: &Buck, rolls: &FightRolls) -> CombatReport {
    let attacker_side = side_power(
        attacker,
        defender,
        rolls.attacker_power,
        rolls.attacker_crit,
        rolls.attacker_special,
    );
    let defender_side = side_power(
        defender,
        attacker,
        rolls.defender_power,
        rolls.defender_crit,
        rolls.defender_special,
    );

    let outcome = match attacker_side.power.cmp(&defender_side.power) {
        core::cmp::Ordering::Greater => StyleOutcome::AttackerWins,
        core::cmp::Ordering::Less => StyleOutcome::DefenderWins,
        core::cmp::Ordering::Equal => StyleOutcome::Draw,
    };

    CombatReport {
        outcome,
        attacker: attacker_side,
        defender: defender_side,
    }
}
