//! Named conditions and their attribute flags.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;

macro_rules! conditions {
    ($( $(#[doc = $doc:expr])* $variant:ident => $flag:ident ),* $(,)?) => {
        /// A condition an actor can suffer from.
        ///
        /// Each condition maps to one `is_*` flag of [`Attributes`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum Condition {
            $( $(#[doc = $doc])* $variant, )*
        }

        impl Condition {
            /// Every condition, in declaration order.
            pub const ALL: &'static [Condition] = &[$(Condition::$variant),*];

            /// Name of the attribute flag this condition sets.
            pub fn flag_key(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($flag), )*
                }
            }

            /// Whether the condition is present in `attributes`.
            pub fn is_set(self, attributes: &Attributes) -> bool {
                match self {
                    $( Self::$variant => attributes.$flag, )*
                }
            }

            /// Raise the condition flag on `attributes`.
            pub fn apply(self, attributes: &mut Attributes) {
                match self {
                    $( Self::$variant => attributes.$flag = true, )*
                }
            }
        }
    };
}

conditions! {
    /// Takes damage over time.
    Bleeding => is_bleeding,
    /// Cannot see.
    Blinded => is_blinded,
    /// On fire.
    Burning => is_burning,
    /// Under another's influence.
    Charmed => is_charmed,
    /// Reeling from a blow.
    Dazed => is_dazed,
    /// Cannot hear.
    Deafened => is_deafened,
    /// Marked for death.
    Doomed => is_doomed,
    /// Guard is open.
    Exposed => is_exposed,
    /// Afraid.
    Frightened => is_frightened,
    /// Held in place by a grapple.
    Grappled => is_grappled,
    /// Movement or actions hampered.
    Hindered => is_hindered,
    /// Abilities weakened.
    Impaired => is_impaired,
    /// Cannot act.
    Incapacitated => is_incapacitated,
    /// Cowed.
    Intimidated => is_intimidated,
    /// Cannot be seen.
    Invisible => is_invisible,
    /// Cannot move.
    Paralyzed => is_paralyzed,
    /// Turned to stone.
    Petrified => is_petrified,
    /// Poisoned.
    Poisoned => is_poisoned,
    /// Lying on the ground.
    Prone => is_prone,
    /// Bound.
    Restrained => is_restrained,
    /// Reduced speed.
    Slowed => is_slowed,
    /// Stunned.
    Stunned => is_stunned,
    /// Knocked out.
    Unconscious => is_unconscious,
}

impl Condition {
    /// The capitalized condition name.
    pub fn name(self) -> String {
        let key = self.flag_key().trim_start_matches("is_");
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The conditions present in `attributes`.
    pub fn active(attributes: &Attributes) -> Vec<Condition> {
        Self::ALL
            .iter()
            .copied()
            .filter(|c| c.is_set(attributes))
            .collect()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_condition_maps_to_a_flag() {
        let attrs = Attributes::default();
        for condition in Condition::ALL {
            assert!(
                Attributes::FLAG_KEYS.contains(&condition.flag_key()),
                "{condition} has no flag"
            );
            assert!(!condition.is_set(&attrs));
        }
    }

    #[test]
    fn apply_sets_only_its_flag() {
        let mut attrs = Attributes::default();
        Condition::Exposed.apply(&mut attrs);
        assert!(attrs.is_exposed);
        assert_eq!(Condition::active(&attrs), vec![Condition::Exposed]);
    }

    #[test]
    fn names_are_capitalized() {
        assert_eq!(Condition::Bleeding.to_string(), "Bleeding");
        assert_eq!(Condition::Unconscious.name(), "Unconscious");
    }
}
