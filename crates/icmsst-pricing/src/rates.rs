//! # Rate Resolution
//!
//! Interstate ICMS rate and adjusted MVA.
//!
//! ## Interstate rate
//!
//! Movements inside one state carry no interstate rate. Goods leaving the
//! South/Southeast for the North, Northeast or Center-West pay 7%; every
//! other interstate movement pays 12%.
//!
//! Codes outside both region lists are not rejected. They count as "not
//! South/Southeast", which puts them in the 12% bracket as an origin and
//! in the 7% bracket as a destination of a South/Southeast origin.
//! [`resolve_interstate`] reports [`Region::Unrecognized`] so callers can
//! surface that.
//!
//! ## Adjusted MVA
//!
//! ```text
//! adjusted = ((1 + mva) * (1 - interstate) / (1 - internal_destination)) - 1
//! ```
//!
//! with every rate converted to a fraction first and the result converted
//! back to a percent. No rounding.

use icmsst_core::{Percent, UfCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// South and Southeast states.
pub const SOUTH_SOUTHEAST: [&str; 7] = ["ES", "MG", "PR", "RJ", "RS", "SC", "SP"];

/// North, Northeast and Center-West states, Distrito Federal included.
pub const NORTH_NORTHEAST_CENTER_WEST: [&str; 20] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "GO", "MA", "MS", "MT", "PA", "PB", "PE", "PI",
    "RN", "RO", "RR", "SE", "TO",
];

/// Rate for South/Southeast origins shipping to the other regions.
pub const REDUCED_INTERSTATE_RATE: u32 = 7;

/// Rate for every other interstate movement.
pub const STANDARD_INTERSTATE_RATE: u32 = 12;

/// Rate-resolution region of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    SouthSoutheast,
    NorthNortheastCenterWest,
    /// Not in either list.
    Unrecognized,
}

impl Region {
    /// Classify a state code.
    pub fn of(uf: &UfCode) -> Self {
        let code = uf.as_str();
        if SOUTH_SOUTHEAST.contains(&code) {
            Self::SouthSoutheast
        } else if NORTH_NORTHEAST_CENTER_WEST.contains(&code) {
            Self::NorthNortheastCenterWest
        } else {
            Self::Unrecognized
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SouthSoutheast => "south_southeast",
            Self::NorthNortheastCenterWest => "north_northeast_center_west",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interstate rate together with the region classification behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterstateResolution {
    pub rate: Percent,
    pub origin_region: Region,
    pub destination_region: Region,
    pub intrastate: bool,
}

impl InterstateResolution {
    /// Whether either side fell outside the known region lists.
    ///
    /// Intrastate movements never count: their rate is 0 regardless.
    pub fn has_unrecognized_region(&self) -> bool {
        !self.intrastate
            && (self.origin_region == Region::Unrecognized
                || self.destination_region == Region::Unrecognized)
    }
}

/// Resolve the interstate rate and report the regions involved.
pub fn resolve_interstate(origin: &UfCode, destination: &UfCode) -> InterstateResolution {
    let origin_region = Region::of(origin);
    let destination_region = Region::of(destination);

    if origin == destination {
        return InterstateResolution {
            rate: Percent::ZERO,
            origin_region,
            destination_region,
            intrastate: true,
        };
    }

    let rate = if origin_region == Region::SouthSoutheast
        && destination_region != Region::SouthSoutheast
    {
        REDUCED_INTERSTATE_RATE
    } else {
        STANDARD_INTERSTATE_RATE
    };

    InterstateResolution {
        rate: Percent::from(rate),
        origin_region,
        destination_region,
        intrastate: false,
    }
}

/// Interstate ICMS rate between two states. 0 for the same state.
pub fn interstate_rate(origin: &UfCode, destination: &UfCode) -> Percent {
    resolve_interstate(origin, destination).rate
}

/// Adjust a nominal MVA for the interstate and destination internal rates.
///
/// Returns `original` unchanged when the interstate rate is zero, and also
/// when the destination internal rate is 100% or more (the formula has no
/// finite value there). An adjustment past [`Percent::MAX_MARKUP`] counts
/// as the same degenerate case.
pub fn adjusted_mva(original: Percent, interstate: Percent, destination_internal: Percent) -> Percent {
    if interstate.is_zero() {
        return original;
    }

    let denominator = Decimal::ONE - destination_internal.fraction();
    if denominator <= Decimal::ZERO {
        return original;
    }

    let numerator = (Decimal::ONE + original.fraction()) * (Decimal::ONE - interstate.fraction());
    let adjusted = numerator
        .checked_div(denominator)
        .and_then(|factor| (factor - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED))
        .map(Percent::new);
    match adjusted {
        Some(mva) if mva <= Percent::MAX_MARKUP => mva,
        _ => original,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icmsst_core::round_money;

    fn uf(s: &str) -> UfCode {
        UfCode::new(s).unwrap()
    }

    #[test]
    fn region_lists_cover_all_27_units_once() {
        assert_eq!(SOUTH_SOUTHEAST.len() + NORTH_NORTHEAST_CENTER_WEST.len(), 27);
        for code in SOUTH_SOUTHEAST {
            assert!(!NORTH_NORTHEAST_CENTER_WEST.contains(&code));
        }
    }

    #[test]
    fn same_state_is_zero() {
        assert_eq!(interstate_rate(&uf("SP"), &uf("SP")), Percent::ZERO);
        assert_eq!(interstate_rate(&uf("BA"), &uf("BA")), Percent::ZERO);
        assert_eq!(interstate_rate(&uf("XX"), &uf("XX")), Percent::ZERO);
    }

    #[test]
    fn south_southeast_to_north_is_seven() {
        assert_eq!(interstate_rate(&uf("SP"), &uf("BA")), Percent::from(7));
        assert_eq!(interstate_rate(&uf("RS"), &uf("DF")), Percent::from(7));
    }

    #[test]
    fn within_south_southeast_is_twelve() {
        assert_eq!(interstate_rate(&uf("SP"), &uf("RJ")), Percent::from(12));
        assert_eq!(interstate_rate(&uf("PR"), &uf("ES")), Percent::from(12));
    }

    #[test]
    fn north_to_south_is_twelve() {
        assert_eq!(interstate_rate(&uf("BA"), &uf("SP")), Percent::from(12));
        assert_eq!(interstate_rate(&uf("AM"), &uf("PE")), Percent::from(12));
    }

    #[test]
    fn unknown_codes_fall_through() {
        let r = resolve_interstate(&uf("XX"), &uf("SP"));
        assert_eq!(r.rate, Percent::from(12));
        assert_eq!(r.origin_region, Region::Unrecognized);
        assert!(r.has_unrecognized_region());

        let r = resolve_interstate(&uf("SP"), &uf("ZZ"));
        assert_eq!(r.rate, Percent::from(7));
        assert!(r.has_unrecognized_region());
    }

    #[test]
    fn intrastate_unknown_is_not_flagged() {
        let r = resolve_interstate(&uf("XX"), &uf("XX"));
        assert!(r.intrastate);
        assert!(!r.has_unrecognized_region());
    }

    #[test]
    fn adjusted_mva_identity_without_interstate() {
        let mva = Percent::from_parts(7178, 2);
        assert_eq!(adjusted_mva(mva, Percent::ZERO, Percent::from(18)), mva);
    }

    #[test]
    fn adjusted_mva_formula() {
        let adj = adjusted_mva(Percent::from(32), Percent::from(12), Percent::from(18));
        // (1.32 * 0.88 / 0.82 - 1) * 100
        assert_eq!(round_money(adj.value()), Decimal::new(4166, 2));

        let adj = adjusted_mva(
            Percent::from_parts(7178, 2),
            Percent::from(12),
            Percent::from(18),
        );
        assert_eq!(round_money(adj.value()), Decimal::new(8435, 2));
    }

    #[test]
    fn adjusted_equals_original_when_rates_match() {
        let adj = adjusted_mva(Percent::from(40), Percent::from(18), Percent::from(18));
        assert_eq!(adj, Percent::from(40));
    }

    #[test]
    fn adjusted_mva_degenerate_denominator() {
        let mva = Percent::from(30);
        assert_eq!(adjusted_mva(mva, Percent::from(12), Percent::from(100)), mva);
    }

    #[test]
    fn adjusted_mva_near_total_internal_rate_keeps_original() {
        let mva = Percent::from(30);
        let internal: Percent = "99.99999999999999999999999999".parse().unwrap();
        assert_eq!(adjusted_mva(mva, Percent::from(12), internal), mva);

        let internal: Percent = "99.9999".parse().unwrap();
        assert_eq!(adjusted_mva(mva, Percent::from(12), internal), mva);
    }
}
