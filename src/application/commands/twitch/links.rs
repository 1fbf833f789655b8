//! Search and wiki link builders

use crate::application::services::CommandService;
use crate::domain::entities::{Command, Reply};

/// name, aliases, URL prefix, word separator
const LINKS: &[(&str, &[&str], &str, char)] = &[
    ("google", &[], "https://google.com/search?q=", '+'),
    ("imfeelinglucky", &[], "https://google.com/search?btnI&q=", '+'),
    ("lmgtfy", &[], "lmgtfy.com/?q=", '+'),
    ("wiki", &[], "wikipedia.org/wiki/", '_'),
    ("rswiki", &[], "runescape.wikia.com/wiki/", '_'),
    ("07rswiki", &["rswiki07", "osrswiki", "rswikios"], "oldschoolrunescape.wikia.com/wiki/", '_'),
];

pub fn register(commands: &mut CommandService) {
    for &(name, aliases, prefix, separator) in LINKS {
        commands.register(
            Command::new(name)
                .with_description(format!("Link to {}", prefix))
                .with_aliases(aliases)
                .with_handler(move |msg| {
                    let text = link(prefix, separator, msg.content.args());
                    async move { Ok(Reply::text(text)) }
                }),
        );
    }
}

pub fn link(prefix: &str, separator: char, words: &[String]) -> String {
    format!("{}{}", prefix, words.join(&separator.to_string()))
}
