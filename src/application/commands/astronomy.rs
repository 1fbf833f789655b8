//! ISS and people-in-space commands

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::services::CommandService;
use crate::domain::entities::{Command, Reply};
use crate::infrastructure::apis::astronomy::{IssNow, PeopleInSpace};
use crate::infrastructure::apis::AstronomyApi;

const MAP_ICON: &str = "http://i.imgur.com/KPfeEcc.png";

pub fn register(commands: &mut CommandService, api: Arc<AstronomyApi>) {
    let iss_api = api.clone();
    commands.register(
        Command::new("iss")
            .with_description("Current location of the International Space Station (ISS)")
            .with_aliases(&["international_space_station", "internationalspacestation"])
            .with_handler(move |_| {
                let api = iss_api.clone();
                async move { Ok(Reply::text(format_iss(&api.iss_now().await?))) }
            }),
    );

    commands.register(
        Command::new("people")
            .with_description("Current people in space")
            .with_aliases(&["astronauts"])
            .with_handler(move |_| {
                let api = api.clone();
                async move { Ok(Reply::text(format_people(&api.people_in_space().await?))) }
            }),
    );
}

pub fn format_iss(iss: &IssNow) -> String {
    let (lat, lon) = (&iss.iss_position.latitude, &iss.iss_position.longitude);
    let map_url = format!(
        "https://maps.googleapis.com/maps/api/staticmap?center={0},{1}&zoom=3&size=640x640&maptype=hybrid&markers=icon:{2}|anchor:center|{0},{1}",
        lat, lon, MAP_ICON
    );
    let mut text = format!("Latitude: {}\nLongitude: {}\n{}", lat, lon, map_url);
    if let Some(time) = DateTime::<Utc>::from_timestamp(iss.timestamp, 0) {
        text.push_str(&format!("\n{}", time.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    text
}

pub fn format_people(people: &PeopleInSpace) -> String {
    let mut lines = vec![format!("Current People In Space ({})", people.number)];
    lines.extend(people.people.iter().map(|p| format!("{} ({})", p.name, p.craft)));
    lines.join("\n")
}
