//! Overwatch hero, ability and achievement lookups

use std::sync::Arc;

use crate::application::errors::{ApiError, CommandError};
use crate::application::services::CommandService;
use crate::domain::entities::{Command, Message, Reply};
use crate::infrastructure::apis::overwatch::{find_by_name, Ability, Achievement, Hero};
use crate::infrastructure::apis::OverwatchApi;

const MAX_DIFFICULTY: u8 = 3;

pub fn register(commands: &mut CommandService, api: Arc<OverwatchApi>) {
    commands.register(
        Command::new("overwatch")
            .with_description("Overwatch heroes, abilities and achievements")
            .with_usage("overwatch <hero|ability|achievement> <name>")
            .with_handler(move |msg| {
                let api = api.clone();
                async move { overwatch(&api, &msg).await }
            }),
    );
}

async fn overwatch(api: &OverwatchApi, msg: &Message) -> Result<Reply, CommandError> {
    let (sub, name) = match msg.content.rest().split_once(char::is_whitespace) {
        Some((sub, name)) if !name.trim().is_empty() => (sub.to_lowercase(), name.trim()),
        _ => return Err(CommandError::InvalidArgs("usage: overwatch <hero|ability|achievement> <name>".into())),
    };

    match sub.as_str() {
        "hero" => {
            let heroes = api.heroes().await?;
            let hero = find_by_name(&heroes, name, |h| h.name.as_str())
                .ok_or_else(|| ApiError::NotFound("Hero".into()))?;
            Ok(Reply::text(format_hero(hero)))
        }
        "ability" | "weapon" => {
            let abilities = api.abilities().await?;
            let ability = find_by_name(&abilities, name, |a| a.name.as_str())
                .ok_or_else(|| ApiError::NotFound("Ability".into()))?;
            Ok(Reply::text(format_ability(ability)))
        }
        "achievement" => {
            let achievements = api.achievements().await?;
            let achievement = find_by_name(&achievements, name, |a| a.name.as_str())
                .ok_or_else(|| ApiError::NotFound("Achievement".into()))?;
            Ok(Reply::text(format_achievement(achievement)))
        }
        other => Err(CommandError::InvalidArgs(format!("unknown overwatch subcommand {}", other))),
    }
}

pub fn format_hero(hero: &Hero) -> String {
    let mut lines = vec![
        hero.name.clone(),
        hero.description.clone(),
        format!("Health: {}", hero.health),
        format!("Armor: {}", hero.armour),
        format!("Shield: {}", hero.shield),
        format!("Real Name: {}", hero.real_name),
    ];
    if let Some(age) = hero.age {
        lines.push(format!("Age: {}", age));
    }
    if let Some(height) = hero.height {
        lines.push(format!("Height: {}", height));
    }
    if let Some(affiliation) = hero.affiliation.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Affiliation: {}", affiliation));
    }
    if let Some(base) = hero.base_of_operations.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Base Of Operations: {}", base));
    }
    lines.push(format!("Difficulty: {}", difficulty_stars(hero.difficulty)));
    lines.join("\n")
}

pub fn format_ability(ability: &Ability) -> String {
    format!(
        "{}\n{}\nHero: {}\nUltimate: {}",
        ability.name,
        ability.description,
        ability.hero.name,
        if ability.is_ultimate { "Yes" } else { "No" }
    )
}

pub fn format_achievement(achievement: &Achievement) -> String {
    let mut lines = vec![
        achievement.name.clone(),
        achievement.description.clone(),
        format!("Reward: {} {}", achievement.reward.name, achievement.reward.kind.name),
    ];
    if let Some(hero) = &achievement.hero {
        lines.push(format!("Hero: {}", hero.name));
    }
    lines.join("\n")
}

/// `2` -> `★★☆`
pub fn difficulty_stars(difficulty: u8) -> String {
    let filled = difficulty.min(MAX_DIFFICULTY) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_DIFFICULTY as usize - filled))
}
