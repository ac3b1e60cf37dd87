// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Feature Config
//!
//! Validates and normalizes the generation features enabled for a run.
//! Settings arrive as an ordered list; the first setting for a feature is
//! authoritative and later ones are collected as diagnostics. The result
//! is an immutable five-flag value passed by value through every
//! component, never ambient state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed feature enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Mirror record/variant/alias structure instead of axiomatizing.
    TransparentTypes,
    /// Treat values without a `pure` attribute as pure.
    PureModule,
    /// Encode impure values as constructors of a primitive interface.
    Interface,
    /// Encode impure values with an IO-style monadic wrapper.
    SimpleIO,
    /// Additionally derive a semantics for the interface. Requires
    /// `Interface`.
    FreeSpec,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::TransparentTypes,
        Feature::PureModule,
        Feature::Interface,
        Feature::SimpleIO,
        Feature::FreeSpec,
    ];

    /// The kebab-case external name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::TransparentTypes => "transparent-types",
            Feature::PureModule => "pure-module",
            Feature::Interface => "interface",
            Feature::SimpleIO => "simple-io",
            Feature::FreeSpec => "freespec",
        }
    }

    fn index(self) -> usize {
        match self {
            Feature::TransparentTypes => 0,
            Feature::PureModule => 1,
            Feature::Interface => 2,
            Feature::SimpleIO => 3,
            Feature::FreeSpec => 4,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One explicit `(feature, enabled)` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSetting {
    pub feature: Feature,
    pub enabled: bool,
}

impl FromStr for FeatureSetting {
    type Err = ConfigError;

    /// Parses the external spelling: the feature name enables, its `no-`
    /// form disables (`interface` / `no-interface`).
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let (name, enabled) = match s.strip_prefix("no-") {
            Some(rest) => (rest, false),
            None => (s, true),
        };
        let feature = Feature::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ConfigError::UnknownFeature(s.to_string()))?;
        Ok(FeatureSetting { feature, enabled })
    }
}

impl fmt::Display for FeatureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            f.write_str(self.feature.name())
        } else {
            write!(f, "no-{}", self.feature.name())
        }
    }
}

/// A duplicate setting diagnostic: the ignored setting together with the
/// value that stayed authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateSetting {
    pub setting: FeatureSetting,
    pub kept: bool,
}

impl fmt::Display for DuplicateSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate setting `{}` ignored; `{}` is already {}",
            self.setting,
            self.setting.feature,
            if self.kept { "enabled" } else { "disabled" },
        )
    }
}

/// Fatal configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the freespec feature requires the interface feature")]
    FreeSpecWithoutInterface,
    #[error("unknown feature name `{0}`")]
    UnknownFeature(String),
}

/// The validated, immutable feature set of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSet {
    flags: [bool; 5],
}

impl FeatureSet {
    /// Fold the ordered settings into a feature set.
    ///
    /// The first setting per feature wins; every later setting for an
    /// already-set feature is returned, in arrival order, as a diagnostic.
    /// Fails with `FreeSpecWithoutInterface` when the resulting set enables
    /// FreeSpec without Interface.
    pub fn from_settings(
        settings: &[FeatureSetting],
    ) -> Result<(FeatureSet, Vec<DuplicateSetting>), ConfigError> {
        let mut first: [Option<bool>; 5] = [None; 5];
        let mut duplicates = Vec::new();

        for &setting in settings {
            match first[setting.feature.index()] {
                None => first[setting.feature.index()] = Some(setting.enabled),
                Some(kept) => duplicates.push(DuplicateSetting { setting, kept }),
            }
        }

        let set = FeatureSet {
            flags: first.map(|flag| flag.unwrap_or(false)),
        };
        if set.enabled(Feature::FreeSpec) && !set.enabled(Feature::Interface) {
            return Err(ConfigError::FreeSpecWithoutInterface);
        }
        Ok((set, duplicates))
    }

    pub fn enabled(self, feature: Feature) -> bool {
        self.flags[feature.index()]
    }

    pub fn transparent_types(self) -> bool {
        self.enabled(Feature::TransparentTypes)
    }

    pub fn pure_module(self) -> bool {
        self.enabled(Feature::PureModule)
    }

    pub fn interface(self) -> bool {
        self.enabled(Feature::Interface)
    }

    pub fn simple_io(self) -> bool {
        self.enabled(Feature::SimpleIO)
    }

    pub fn free_spec(self) -> bool {
        self.enabled(Feature::FreeSpec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(s: &str) -> FeatureSetting {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_names_and_negations() {
        for feature in Feature::ALL {
            let on = setting(feature.name());
            assert_eq!(on, FeatureSetting { feature, enabled: true });
            let off = setting(&format!("no-{}", feature.name()));
            assert_eq!(off, FeatureSetting { feature, enabled: false });
        }
        assert_eq!(
            "simpleio".parse::<FeatureSetting>(),
            Err(ConfigError::UnknownFeature("simpleio".to_string()))
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let (set, duplicates) =
            FeatureSet::from_settings(&[setting("interface"), setting("no-interface")]).unwrap();
        assert!(set.interface());
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].setting, setting("no-interface"));
        assert!(duplicates[0].kept);
    }

    #[test]
    fn test_duplicates_reported_in_arrival_order() {
        let (set, duplicates) = FeatureSet::from_settings(&[
            setting("no-simple-io"),
            setting("interface"),
            setting("simple-io"),
            setting("no-interface"),
        ])
        .unwrap();
        assert!(!set.simple_io());
        assert!(set.interface());
        let reported: Vec<String> = duplicates.iter().map(|d| d.setting.to_string()).collect();
        assert_eq!(reported, ["simple-io", "no-interface"]);
    }

    #[test]
    fn test_freespec_requires_interface() {
        let err = FeatureSet::from_settings(&[setting("freespec")]).unwrap_err();
        assert_eq!(err, ConfigError::FreeSpecWithoutInterface);

        let err =
            FeatureSet::from_settings(&[setting("freespec"), setting("no-interface")]).unwrap_err();
        assert_eq!(err, ConfigError::FreeSpecWithoutInterface);

        let (set, _) =
            FeatureSet::from_settings(&[setting("freespec"), setting("interface")]).unwrap();
        assert!(set.free_spec() && set.interface());
    }

    #[test]
    fn test_defaults_are_off() {
        let (set, duplicates) = FeatureSet::from_settings(&[]).unwrap();
        assert_eq!(set, FeatureSet::default());
        assert!(duplicates.is_empty());
        for feature in Feature::ALL {
            assert!(!set.enabled(feature));
        }
    }
}
