use crate::model::{AuthguardConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
use crate::presets;
use anyhow::Context;
use authguard_domain::{Rule, RuleChain, RuleOp, TransactionAppliesTo};
use authguard_types::PolicyMode;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub default_policy: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub chain: RuleChain,
}

pub fn resolve_config(
    cfg: AuthguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let Some(preset) = presets::preset(&profile) else {
        anyhow::bail!(
            "unknown profile: {profile} (expected {})",
            presets::known_profiles().join("|")
        );
    };

    let mut default_policy = preset.default_policy;
    if let Some(policy_s) = overrides
        .default_policy
        .as_deref()
        .or(cfg.default_policy.as_deref())
    {
        default_policy = parse_mode(policy_s).context("invalid default_policy")?;
    }

    let mut rules = Vec::with_capacity(cfg.rules.len() + preset.trailing_rules.len());
    for (index, rc) in cfg.rules.iter().enumerate() {
        let rule = build_rule(rc)
            .with_context(|| format!("invalid rule #{} ('{}')", index + 1, rc.name))?;
        rules.push(rule);
    }
    rules.extend(preset.trailing_rules);

    Ok(ResolvedConfig {
        profile: preset.profile,
        chain: RuleChain::new(rules, default_policy),
    })
}

fn build_rule(rc: &RuleConfig) -> anyhow::Result<Rule> {
    let op = parse_op(&rc.op)?;
    let mut builder = Rule::builder(rc.name.clone())
        .mode(parse_mode(&rc.mode)?)
        .op(op);

    if let Some(resources) = &rc.resources {
        builder = builder.resources_of_type(resources.iter().map(|r| r.trim().to_string()));
    }
    if let Some(compartment) = &rc.compartment {
        builder = builder.in_compartment(
            compartment.name.trim().to_string(),
            compartment.owners.iter().map(String::as_str),
        );
    }
    if let Some(applies_to) = rc.applies_to.as_deref() {
        if !op.is_composite() {
            anyhow::bail!("applies_to is only valid for batch and transaction rules");
        }
        builder = builder.transaction_applies_to(parse_applies_to(applies_to)?);
    }
    if !op.is_filtered() && (rc.resources.is_some() || rc.compartment.is_some()) {
        anyhow::bail!(
            "resources/compartment filters are only valid for read, write and delete rules"
        );
    }

    Ok(builder.build()?)
}

fn parse_mode(v: &str) -> anyhow::Result<PolicyMode> {
    match v {
        "allow" => Ok(PolicyMode::Allow),
        "deny" => Ok(PolicyMode::Deny),
        other => anyhow::bail!("unknown mode: {other} (expected allow|deny)"),
    }
}

fn parse_op(v: &str) -> anyhow::Result<RuleOp> {
    RuleOp::from_token(v).with_context(|| {
        let known: Vec<&str> = RuleOp::ALL.iter().map(|op| op.as_str()).collect();
        format!("unknown op: {v} (expected {})", known.join("|"))
    })
}

fn parse_applies_to(v: &str) -> anyhow::Result<TransactionAppliesTo> {
    match v {
        "batch" => Ok(TransactionAppliesTo::Batch),
        "transaction" => Ok(TransactionAppliesTo::Transaction),
        other => anyhow::bail!("unknown applies_to: {other} (expected batch|transaction)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use authguard_domain::{AppliesTo, Classifier};

    fn resolve(text: &str) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(text)?, Overrides::default())
    }

    #[test]
    fn empty_config_resolves_to_strict() {
        let resolved = resolve("").expect("resolve");
        assert_eq!(resolved.profile, "strict");
        assert_eq!(resolved.chain.default_policy(), PolicyMode::Deny);
        assert!(resolved.chain.rules().is_empty());
    }

    #[test]
    fn rules_keep_order_and_preset_rules_come_last() {
        let resolved = resolve(
            r#"
profile = "capabilities"

[[rules]]
name = "own records"
mode = "allow"
op = "read"
resources = ["Patient", "Observation"]
compartment = { name = "Patient", owners = ["Patient/123"] }

[[rules]]
name = "no deletes"
mode = "deny"
op = "delete"
"#,
        )
        .expect("resolve");

        let names: Vec<&str> = resolved.chain.rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["own records", "no deletes", "preset: capabilities are public"]
        );

        let own = &resolved.chain.rules()[0];
        assert_eq!(own.op(), RuleOp::Read);
        assert!(matches!(own.applies_to(), AppliesTo::Types(t) if t.len() == 2));
        assert!(matches!(
            own.classifier(),
            Classifier::InCompartment { compartment, owners }
                if compartment == "Patient" && owners.len() == 1
        ));
    }

    #[test]
    fn overrides_win_over_config() {
        let cfg = parse_config_toml("profile = \"strict\"\ndefault_policy = \"deny\"\n")
            .expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("open".to_string()),
                default_policy: Some("allow".to_string()),
            },
        )
        .expect("resolve");
        assert_eq!(resolved.profile, "open");
        assert_eq!(resolved.chain.default_policy(), PolicyMode::Allow);
    }

    #[test]
    fn applies_to_overrides_composite_kind() {
        let resolved = resolve(
            r#"
[[rules]]
name = "batches"
mode = "allow"
op = "transaction"
applies_to = "batch"
"#,
        )
        .expect("resolve");
        assert_eq!(
            resolved.chain.rules()[0].transaction_applies_to(),
            TransactionAppliesTo::Batch
        );
    }

    #[test]
    fn invalid_rules_name_the_rule() {
        let err = resolve(
            r#"
[[rules]]
name = "empty types"
mode = "allow"
op = "read"
resources = []
"#,
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("rule #1 ('empty types')"), "{msg}");
        assert!(msg.contains("lists none"), "{msg}");
    }

    #[test]
    fn allow_all_with_deny_mode_is_rejected() {
        let err = resolve(
            r#"
[[rules]]
name = "block everything"
mode = "deny"
op = "allow_all"
"#,
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("rule #1 ('block everything')"), "{msg}");
        assert!(msg.contains("op allow_all with a conflicting mode"), "{msg}");
    }

    #[test]
    fn compartment_owners_need_a_type() {
        let err = resolve(
            r#"
[[rules]]
name = "own records"
mode = "allow"
op = "read"
compartment = { name = "Patient", owners = ["123"] }
"#,
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("rule #1 ('own records')"), "{msg}");
        assert!(msg.contains("owner '123' without a resource type"), "{msg}");
    }

    #[test]
    fn rejects_unknown_tokens() {
        let err = resolve("[[rules]]\nname = \"x\"\nmode = \"maybe\"\nop = \"read\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown mode: maybe"));

        let err = resolve("[[rules]]\nname = \"x\"\nmode = \"allow\"\nop = \"search\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown op: search"));

        let err = resolve("profile = \"lenient\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown profile: lenient"));

        let err = resolve("schema = \"authguard.config.v9\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("unsupported config schema"));
    }

    #[test]
    fn rejects_filters_on_unfiltered_ops() {
        let err = resolve(
            r#"
[[rules]]
name = "typed allow all"
mode = "allow"
op = "allow_all"
resources = ["Patient"]
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("only valid for read, write and delete"));

        let err = resolve(
            r#"
[[rules]]
name = "read batch"
mode = "allow"
op = "read"
applies_to = "batch"
"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("only valid for batch and transaction"));
    }
}
