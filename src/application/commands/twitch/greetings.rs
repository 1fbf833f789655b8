//! Greetings, hugs and highfives

use rand::Rng;

use crate::application::errors::CommandError;
use crate::application::services::CommandService;
use crate::domain::entities::user::title_case;
use crate::domain::entities::{Command, Message, Reply};

/// Who sent a message and who it names
struct Greeting<'a> {
    /// Sender as addressed in replies
    source: String,
    /// Sender's login, lowercase
    login: String,
    /// Text after the command name
    target: &'a str,
    bot_name: &'a str,
}

impl<'a> Greeting<'a> {
    fn from_message(msg: &'a Message, bot_name: &'a str) -> Self {
        let login = msg
            .sender
            .as_ref()
            .and_then(|u| u.username.clone())
            .unwrap_or_default()
            .to_lowercase();
        Self {
            source: msg.sender_name(),
            login,
            target: msg.content.rest().trim(),
            bot_name,
        }
    }

    fn first_word(&self) -> Option<String> {
        self.target.split_whitespace().next().map(str::to_lowercase)
    }

    fn addresses_bot(&self) -> bool {
        self.first_word().as_deref() == Some(self.bot_name)
    }

    /// `Hello, Source!` or `Target, Source says hello!`
    fn salute(&self, opener: &str, says: &str) -> String {
        if self.target.is_empty() || self.addresses_bot() {
            format!("{}, {}!", opener, self.source)
        } else {
            format!("{}, {} says {}!", title_case(self.target), self.source, says)
        }
    }

    /// `hug` and `highfive`
    fn gesture(&self, verb: &str) -> String {
        match self.first_word() {
            None => format!("{} {}s no one. :-/", self.source, verb),
            Some(word) if word == self.login => format!("{} {}s themselves. o_O", self.source, verb),
            Some(word) if word == self.bot_name => format!("!{} {}", verb, self.source),
            Some(_) => format!("{} {}s {}!", self.source, verb, title_case(self.target)),
        }
    }

    fn congrats(&self) -> String {
        if self.target.is_empty() {
            "Congratulations!!!!!".to_string()
        } else {
            format!("Congratulations, {}!!!!!", title_case(self.target))
        }
    }
}

pub fn register(commands: &mut CommandService, bot_name: &str) {
    type Build = fn(&Greeting<'_>) -> String;
    let table: [(&str, &[&str], &str, Build); 5] = [
        ("hello", &["hi"], "Say hello", |g| g.salute("Hello", "hello")),
        ("bye", &[], "Say goodbye", |g| g.salute("Bye", "goodbye")),
        ("congrats", &["grats", "gz"], "Congratulate someone", |g| g.congrats()),
        ("hug", &[], "Hug someone", |g| g.gesture("hug")),
        ("highfive", &[], "Highfive someone", |g| g.gesture("highfive")),
    ];

    for (name, aliases, description, build) in table {
        let bot_name = bot_name.to_lowercase();
        commands.register(
            Command::new(name)
                .with_description(description)
                .with_aliases(aliases)
                .with_handler(move |msg| {
                    let text = build(&Greeting::from_message(&msg, &bot_name));
                    async move { Ok(Reply::text(text)) }
                }),
        );
    }

    commands.register(
        Command::new("rng")
            .with_description("Random number between 1 and max (default 10)")
            .with_usage("rng [max]")
            .with_handler(|msg| async move { rng(&msg) }),
    );
}

fn rng(msg: &Message) -> Result<Reply, CommandError> {
    let max = msg
        .content
        .args()
        .first()
        .and_then(|s| s.parse::<f64>().ok())
        .map(|n| n.trunc())
        .filter(|n| *n >= 1.0 && *n <= i64::MAX as f64)
        .map(|n| n as i64)
        .unwrap_or(10);
    let value = rand::thread_rng().gen_range(1..=max);
    Ok(Reply::text(value.to_string()))
}
