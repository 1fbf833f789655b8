//! RuneScape experience calculators

use crate::application::commands::format::with_commas;
use crate::application::services::CommandService;
use crate::domain::entities::{Command, Reply};

const MAX_LEVEL: i64 = 126;
/// Exclusive ceiling on experience
const XP_CEILING: f64 = 200_000_001.0;

pub fn register(commands: &mut CommandService) {
    commands.register(
        Command::new("level")
            .with_description("Experience needed for a level")
            .with_usage("level <level>")
            .with_handler(|msg| {
                let text = level(msg.content.args().first().map(String::as_str));
                async move { Ok(Reply::text(text)) }
            }),
    );

    commands.register(
        Command::new("xpat")
            .with_description("Level reached at an amount of experience")
            .with_usage("xpat <xp>")
            .with_handler(|msg| {
                let text = xp_at(msg.content.args().first().map(String::as_str));
                async move { Ok(Reply::text(text)) }
            }),
    );

    commands.register(
        Command::new("xpbetween")
            .with_description("Experience between two levels")
            .with_usage("xpbetween <start> <end>")
            .with_handler(|msg| {
                let text = xp_between(msg.content.args());
                async move { Ok(Reply::text(text)) }
            }),
    );
}

/// Experience added on the way from `level` to `level + 1`, times four
fn step(level: i64) -> f64 {
    (level as f64 + 300.0 * 2f64.powf(level as f64 / 7.0)).trunc()
}

/// Total experience needed to reach `level`
pub fn xp_for_level(level: i64) -> i64 {
    let total: f64 = (1..level).map(step).sum();
    (total / 4.0).trunc() as i64
}

/// Highest level reached with `xp` experience
pub fn level_at(xp: i64) -> i64 {
    let mut level = 1;
    let mut threshold = 0.0;
    while xp as f64 >= threshold {
        threshold = (threshold * 4.0 + step(level)) / 4.0;
        level += 1;
    }
    level - 1
}

pub fn level(arg: Option<&str>) -> String {
    let Some(arg) = arg else {
        return "Please enter a level.".to_string();
    };
    let Ok(level) = arg.parse::<i64>() else {
        return "Syntax error.".to_string();
    };

    match level {
        1..=MAX_LEVEL => format!("Runescape Level {} = {} xp", level, with_commas(xp_for_level(level))),
        9000 => "Almost there.".to_string(),
        l if l > 9000 => "It's over 9000!".to_string(),
        l if l > MAX_LEVEL => format!("I was gonna calculate xp at Level {}. Then I took an arrow to the knee.", l),
        l => format!("Level {} does not exist.", l),
    }
}

pub fn xp_at(arg: Option<&str>) -> String {
    let Some(arg) = arg else {
        return "Please enter xp.".to_string();
    };
    let Ok(xp) = arg.replace(',', "").parse::<f64>() else {
        return "Syntax error.".to_string();
    };
    if !(0.0..XP_CEILING).contains(&xp) {
        return "You can't have that much xp!".to_string();
    }

    let xp = xp.trunc() as i64;
    format!("{} xp = level {}", with_commas(xp), level_at(xp))
}

pub fn xp_between(args: &[String]) -> String {
    let level_arg = |i: usize| {
        args.get(i)
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|l| (1..=MAX_LEVEL).contains(l))
    };
    let (Some(start), Some(end)) = (level_arg(0), level_arg(1)) else {
        return "Syntax error.".to_string();
    };

    let mut total = 0.0;
    let mut start_xp = 0;
    for level in 1..end {
        if level == start {
            start_xp = (total / 4.0_f64).trunc() as i64;
        }
        total += step(level);
    }
    let between = (total / 4.0).trunc() as i64 - start_xp;
    format!("{} xp between level {} and level {}", with_commas(between), start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_for_level(99), 13_034_431);
        assert_eq!(level(Some("99")), "Runescape Level 99 = 13,034,431 xp");
    }

    #[test]
    fn test_level_easter_eggs() {
        assert_eq!(level(None), "Please enter a level.");
        assert_eq!(level(Some("nine")), "Syntax error.");
        assert_eq!(level(Some("9001")), "It's over 9000!");
        assert_eq!(level(Some("9000")), "Almost there.");
        assert_eq!(
            level(Some("200")),
            "I was gonna calculate xp at Level 200. Then I took an arrow to the knee."
        );
        assert_eq!(level(Some("0")), "Level 0 does not exist.");
        assert_eq!(level(Some("-5")), "Level -5 does not exist.");
    }

    #[test]
    fn test_xp_at() {
        assert_eq!(xp_at(Some("0")), "0 xp = level 1");
        assert_eq!(xp_at(Some("83")), "83 xp = level 2");
        assert_eq!(xp_at(Some("13,034,431")), "13,034,431 xp = level 99");
        assert_eq!(xp_at(Some("13034430")), "13,034,430 xp = level 98");
        assert_eq!(xp_at(Some("200000000.5")), "200,000,000 xp = level 126");
        assert_eq!(xp_at(Some("200000001")), "You can't have that much xp!");
        assert_eq!(xp_at(Some("-1")), "You can't have that much xp!");
        assert_eq!(xp_at(Some("lots")), "Syntax error.");
        assert_eq!(xp_at(None), "Please enter xp.");
    }

    #[test]
    fn test_xp_between() {
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(xp_between(&args(&["1", "99"])), "13,034,431 xp between level 1 and level 99");
        assert_eq!(xp_between(&args(&["2", "3"])), format!("{} xp between level 2 and level 3", xp_for_level(3) - 83));
        assert_eq!(xp_between(&args(&["1"])), "Syntax error.");
        assert_eq!(xp_between(&args(&["1", "200"])), "Syntax error.");
    }
}
