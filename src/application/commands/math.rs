//! Math commands

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::{CalculatorService, CommandService};
use crate::domain::calculator::{format_value, ErrorKind};
use crate::domain::entities::{Command, Message, Reply};

use super::required_arg;

/// Factorials above this are longer than any platform allows
const MAX_FACTORIAL: u64 = 1000;

type UnaryFn = fn(f64) -> f64;

const UNARY: &[(&str, &str, UnaryFn)] = &[
    ("sin", "Sine function", f64::sin),
    ("cos", "Cosine function", f64::cos),
    ("tan", "Tangent function", f64::tan),
    ("asin", "Arc sine function", f64::asin),
    ("acos", "Arc cosine function", f64::acos),
    ("atan", "Arc tangent function", f64::atan),
    ("sinh", "Hyperbolic sine function", f64::sinh),
    ("cosh", "Hyperbolic cosine function", f64::cosh),
    ("tanh", "Hyperbolic tangent function", f64::tanh),
    ("asinh", "Inverse hyperbolic sine function", f64::asinh),
    ("acosh", "Inverse hyperbolic cosine function", f64::acosh),
    ("atanh", "Inverse hyperbolic tangent function", f64::atanh),
];

pub fn register(commands: &mut CommandService, calculator: Arc<CalculatorService>) {
    commands.register(
        Command::new("calculate")
            .with_description("Calculator")
            .with_aliases(&["calc", "calculator"])
            .with_usage("calculate <expression>")
            .with_handler(move |msg| {
                let calculator = calculator.clone();
                async move { Ok(calculator.calculate(msg.content.rest(), msg.platform).await) }
            }),
    );

    commands.register(
        Command::new("add")
            .with_description("Add numbers together")
            .with_usage("add <numbers...>")
            .with_handler(|msg| async move { add(&msg) }),
    );

    commands.register(
        Command::new("exp")
            .with_description("Exponential function")
            .with_usage("exp <value>")
            .with_handler(|msg| async move { Ok(checked("exp", float_arg(&msg)?, f64::exp)) }),
    );

    commands.register(
        Command::new("factorial")
            .with_description("Factorial")
            .with_usage("factorial <integer>")
            .with_handler(|msg| async move { factorial(&msg) }),
    );

    commands.register(
        Command::new("gcd")
            .with_description("Greatest common divisor")
            .with_aliases(&["greatest_common_divisor"])
            .with_usage("gcd <a> <b>")
            .with_handler(|msg| async move { gcd(&msg) }),
    );

    commands.register(
        Command::new("sqrt")
            .with_description("Square root")
            .with_aliases(&["squareroot", "square_root"])
            .with_usage("sqrt <value>")
            .with_handler(|msg| async move { Ok(checked("sqrt", float_arg(&msg)?, f64::sqrt)) }),
    );

    for &(name, description, function) in UNARY {
        commands.register(
            Command::new(name)
                .with_description(description)
                .with_usage(format!("{} <value>", name))
                .with_handler(move |msg| async move { Ok(checked(name, float_arg(&msg)?, function)) }),
        );
    }
}

fn parse_float(s: &str) -> Result<f64, CommandError> {
    s.parse::<f64>()
        .map_err(|_| CommandError::InvalidArgs(format!("{} is not a number", s)))
}

fn float_arg(msg: &Message) -> Result<f64, CommandError> {
    parse_float(required_arg(msg, 0, "value")?)
}

fn int_arg(msg: &Message, index: usize) -> Result<i64, CommandError> {
    let s = required_arg(msg, index, "value")?;
    s.parse::<i64>()
        .map_err(|_| CommandError::InvalidArgs(format!("{} is not an integer", s)))
}

/// Apply `function` and map non-finite results to math errors
pub fn checked(name: &str, value: f64, function: UnaryFn) -> Reply {
    let result = function(value);
    if result.is_nan() || (result.is_infinite() && (name == "atanh" || name == "sqrt")) {
        return Reply::error(ErrorKind::Internal("math domain error".into()).message());
    }
    if result.is_infinite() && value.is_finite() {
        return Reply::error(ErrorKind::Internal("math range error".into()).message());
    }
    Reply::text(format_value(result))
}

fn add(msg: &Message) -> Result<Reply, CommandError> {
    let numbers = msg
        .content
        .args()
        .iter()
        .map(|s| parse_float(s))
        .collect::<Result<Vec<_>, _>>()?;
    if numbers.is_empty() {
        return Ok(Reply::text("Add what?"));
    }

    let terms: Vec<String> = numbers.iter().map(|n| format_value(*n)).collect();
    Ok(Reply::text(format!(
        "{} = {}",
        terms.join(" + "),
        format_value(numbers.iter().sum())
    )))
}

fn factorial(msg: &Message) -> Result<Reply, CommandError> {
    let n = int_arg(msg, 0)?;
    if n < 0 {
        return Ok(Reply::error("Error: factorial() not defined for negative values"));
    }
    if n as u64 > MAX_FACTORIAL {
        return Ok(Reply::error(ErrorKind::OutputTooLarge.message()));
    }

    let digits = big_factorial(n as u64);
    if digits.len() > msg.platform.message_limit() {
        return Ok(Reply::error(ErrorKind::OutputTooLarge.message()));
    }
    Ok(Reply::text(digits))
}

/// Exact decimal factorial, base 10^9 limbs
pub fn big_factorial(n: u64) -> String {
    const BASE: u64 = 1_000_000_000;
    let mut limbs: Vec<u64> = vec![1];

    for factor in 2..=n {
        let mut carry = 0;
        for limb in limbs.iter_mut() {
            let product = *limb * factor + carry;
            *limb = product % BASE;
            carry = product / BASE;
        }
        while carry > 0 {
            limbs.push(carry % BASE);
            carry /= BASE;
        }
    }

    let mut out = String::new();
    for (i, limb) in limbs.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&limb.to_string());
        } else {
            out.push_str(&format!("{:09}", limb));
        }
    }
    out
}

fn gcd(msg: &Message) -> Result<Reply, CommandError> {
    let (mut a, mut b) = (int_arg(msg, 0)?.unsigned_abs(), int_arg(msg, 1)?.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    Ok(Reply::text(a.to_string()))
}
