//! Unit conversions

use crate::application::commands::format::decimal;
use crate::application::services::CommandService;
use crate::domain::entities::{Command, Reply};

type Convert = fn(f64) -> f64;

/// name, input unit, output unit, conversion
const CONVERSIONS: &[(&str, &str, &str, Convert)] = &[
    ("ctof", "°C", "°F", |x| x * 9.0 / 5.0 + 32.0),
    ("ftoc", "°F", "°C", |x| (x - 32.0) * 5.0 / 9.0),
    ("lbtokg", "lb", "kg", |x| x * 0.45359237),
    ("kgtolb", "kg", "lb", |x| x * 2.2046),
    ("fttom", "ft", "m", |x| x * 0.3048),
    ("mtoft", "m", "ft", |x| x * 3.2808),
    ("gtooz", "g", "oz", |x| x * 0.035274),
    ("oztog", "oz", "g", |x| x / 0.035274),
    ("mitokm", "mi", "km", |x| x / 0.62137),
    ("kmtomi", "km", "mi", |x| x * 0.62137),
    ("ozttog", "oz t", "g", |x| x / 0.032151),
    ("gtoozt", "g", "oz t", |x| x * 0.032151),
    ("ozttooz", "oz t", "oz", |x| x * 1.09714996656),
    ("oztoozt", "oz", "oz t", |x| x * 0.911452427176),
];

pub fn register(commands: &mut CommandService) {
    commands.register(
        Command::new("fitom")
            .with_description("Convert feet and inches to m")
            .with_usage("fitom <feet> <inches>")
            .with_handler(|msg| {
                let text = feet_inches_to_meters(msg.content.args());
                async move { Ok(Reply::text(text)) }
            }),
    );

    commands.register(
        Command::new("mtofi")
            .with_description("Convert m to feet and inches")
            .with_usage("mtofi <value>")
            .with_handler(|msg| {
                let text = meters_to_feet_inches(msg.content.args().first().map(String::as_str));
                async move { Ok(Reply::text(text)) }
            }),
    );

    for &(name, from, to, convert) in CONVERSIONS {
        commands.register(
            Command::new(name)
                .with_description(format!("Convert {} to {}", from, to))
                .with_usage(format!("{} <value>", name))
                .with_handler(move |msg| {
                    let text = conversion(msg.content.args().first().map(String::as_str), from, to, convert);
                    async move { Ok(Reply::text(text)) }
                }),
        );
    }
}

pub fn conversion(arg: Option<&str>, from: &str, to: &str, convert: Convert) -> String {
    let Some(arg) = arg else {
        return "Please enter input.".to_string();
    };
    match arg.parse::<f64>() {
        Ok(value) => format!("{} {} = {} {}", arg, from, decimal(convert(value)), to),
        Err(_) => "Syntax error.".to_string(),
    }
}

pub fn feet_inches_to_meters(args: &[String]) -> String {
    if args.is_empty() {
        return "Please enter input.".to_string();
    }
    let parsed = (args.first().map(|s| s.parse::<f64>()), args.get(1).map(|s| s.parse::<f64>()));
    match parsed {
        (Some(Ok(feet)), Some(Ok(inches))) => format!(
            "{} ft {} in = {} m",
            args[0],
            args[1],
            decimal((feet + inches / 12.0) * 0.3048)
        ),
        _ => "Syntax error.".to_string(),
    }
}

pub fn meters_to_feet_inches(arg: Option<&str>) -> String {
    let Some(arg) = arg else {
        return "Please enter input.".to_string();
    };
    let Ok(meters) = arg.parse::<f64>() else {
        return "Syntax error.".to_string();
    };
    let inches = meters * 39.37;
    let feet = (inches / 12.0).floor();
    format!("{} m = {} ft {} in", arg, decimal(feet), decimal(inches - feet * 12.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, arg: Option<&str>) -> String {
        let &(_, from, to, convert) = CONVERSIONS.iter().find(|c| c.0 == name).unwrap();
        conversion(arg, from, to, convert)
    }

    #[test]
    fn test_temperatures() {
        assert_eq!(run("ctof", Some("100")), "100 °C = 212.0 °F");
        assert_eq!(run("ftoc", Some("212")), "212 °F = 100.0 °C");
    }

    #[test]
    fn test_mass_and_length() {
        assert_eq!(run("kgtolb", Some("10")), "10 kg = 22.046 lb");
        assert_eq!(run("fttom", Some("10")), "10 ft = 3.048 m");
        assert_eq!(run("gtoozt", Some("0")), "0 g = 0.0 oz t");
    }

    #[test]
    fn test_feet_and_inches() {
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(feet_inches_to_meters(&args(&["0", "0"])), "0 ft 0 in = 0.0 m");
        assert!(feet_inches_to_meters(&args(&["10", "0"])).starts_with("10 ft 0 in = 3.04"));
        assert_eq!(feet_inches_to_meters(&args(&[])), "Please enter input.");
        assert_eq!(feet_inches_to_meters(&args(&["6"])), "Syntax error.");
        assert_eq!(feet_inches_to_meters(&args(&["6", "tall"])), "Syntax error.");

        assert_eq!(meters_to_feet_inches(Some("0")), "0 m = 0.0 ft 0.0 in");
        assert!(meters_to_feet_inches(Some("1")).starts_with("1 m = 3.0 ft 3.3"));
        assert_eq!(meters_to_feet_inches(None), "Please enter input.");
        assert_eq!(meters_to_feet_inches(Some("far")), "Syntax error.");
    }

    #[test]
    fn test_validation() {
        assert_eq!(run("lbtokg", None), "Please enter input.");
        assert_eq!(run("lbtokg", Some("heavy")), "Syntax error.");
    }
}
