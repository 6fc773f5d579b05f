use authguard_domain::Rule;
use authguard_types::PolicyMode;

/// Rules and default policy contributed by a profile.
#[derive(Clone, Debug)]
pub struct Preset {
    pub profile: String,
    pub default_policy: PolicyMode,
    /// Appended after the configured rules.
    pub trailing_rules: Vec<Rule>,
}

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<Preset> {
    match profile {
        "strict" => Some(strict_profile()),
        "capabilities" => Some(capabilities_profile()),
        "open" => Some(open_profile()),
        _ => None,
    }
}

pub fn known_profiles() -> &'static [&'static str] {
    &["strict", "capabilities", "open"]
}

fn strict_profile() -> Preset {
    Preset {
        profile: "strict".to_string(),
        default_policy: PolicyMode::Deny,
        trailing_rules: Vec::new(),
    }
}

fn capabilities_profile() -> Preset {
    // Everything closed except the capability statement.
    Preset {
        profile: "capabilities".to_string(),
        default_policy: PolicyMode::Deny,
        trailing_rules: vec![Rule::metadata(
            "preset: capabilities are public",
            PolicyMode::Allow,
        )],
    }
}

fn open_profile() -> Preset {
    Preset {
        profile: "open".to_string(),
        default_policy: PolicyMode::Allow,
        trailing_rules: Vec::new(),
    }
}
