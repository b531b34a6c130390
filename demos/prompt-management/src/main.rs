//! Example demonstrating section composition, conditional inclusion, and
//! state round-trips.

use anyhow::Result;
use prompt_composer::{CompileOptions, PromptBuilder, SectionOptions};
use prompt_model::Value;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Prompt Composer: Section Management Example ===\n");

    // Example 1: Structured payloads with per-level numbering
    demonstrate_sections();

    // Example 2: Conditional sections and macro interpolation
    demonstrate_contexts();

    // Example 3: Serializing builder state for storage or versioning
    demonstrate_state_round_trip()?;

    Ok(())
}

fn demonstrate_sections() {
    println!("--- Example 1: Structured Sections ---\n");

    let mut prompt = PromptBuilder::new();
    prompt.set_with(
        "role",
        "You are a data analyst.",
        SectionOptions {
            title: Some("Role".into()),
            ..Default::default()
        },
    );
    prompt.set_with(
        "workflow",
        Value::from(vec![
            Value::from("Collect data"),
            Value::from_iter([("Preprocess", Value::from(["Clean", "Normalize"]))]),
            Value::from("Analyze"),
        ]),
        SectionOptions {
            title: Some("Workflow".into()),
            header_level: 2,
            ordered: true,
            ..Default::default()
        },
    );
    prompt.append("workflow", "Report findings");

    println!("{}\n", prompt.compile());
}

fn demonstrate_contexts() {
    println!("--- Example 2: Conditions and Macros ---\n");

    let mut prompt = PromptBuilder::new();
    prompt.set_with(
        "language",
        "Always answer in {{user.lang}}.",
        SectionOptions {
            title: Some("Language ({{user.lang}})".into()),
            header_level: 3,
            ..Default::default()
        },
    );
    prompt.set_with(
        "admin-tools",
        ["Manage users", "Audit logs"],
        SectionOptions {
            title: Some("Admin Tools".into()),
            header_level: 3,
            include_if: Some(
                [("user.role".to_owned(), Value::from(["admin", "owner"]))]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        },
    );

    let admin = Value::from_iter([(
        "user",
        Value::from_iter([("lang", Value::from("pt-BR")), ("role", Value::from("admin"))]),
    )]);
    let member = Value::from_iter([(
        "user",
        Value::from_iter([("lang", Value::from("en")), ("role", Value::from("member"))]),
    )]);

    println!("For an admin:\n{}\n", compile_in(&prompt, &admin));
    println!("For a member:\n{}\n", compile_in(&prompt, &member));
}

fn demonstrate_state_round_trip() -> Result<()> {
    println!("--- Example 3: State Round-Trip ---\n");

    let mut prompt = PromptBuilder::new();
    prompt
        .meta_mut()
        .insert("revision".to_owned(), Value::from(3));
    prompt.set_with(
        "policy",
        ["No secrets", "Cite sources"],
        SectionOptions {
            title: Some("Policy".into()),
            ..Default::default()
        },
    );

    let stored = prompt.to_json()?;
    println!("Serialized state:\n{stored}\n");

    let restored = PromptBuilder::from_json(&stored)?;
    println!("Recompiled output:\n{}\n", restored.compile());
    println!("Outputs identical: {}", restored.compile() == prompt.compile());

    Ok(())
}

fn compile_in(prompt: &PromptBuilder, context: &Value) -> String {
    prompt.compile_with(CompileOptions {
        context: Some(context),
        ..Default::default()
    })
}
