use minijinja::{Environment, Template};
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};
use tracing::info;

static TEMPLATES_ENVIRONMENT: Lazy<Environment> = Lazy::new(|| {
    info!("Initializing templating engine environment.");
    let mut env = Environment::new();

    // Use strum to iterate over the variants of the enum.
    for template in MessageTemplate::iter() {
        env.add_template(template.name(), template.template())
            .unwrap();
    }

    info!("Templates loaded in templating engine environment.");

    env
});

#[derive(EnumIter)]
pub enum MessageTemplate {
    Help,
    GameLink,
    Board,
    BoardEmpty,
    BoardUnavailable,
    Profile,
    ProfileNeverPlayed,
    ProfileUnavailable,
}

impl MessageTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            MessageTemplate::Help => "help.txt",
            MessageTemplate::GameLink => "game_link.txt",
            MessageTemplate::Board => "board.txt",
            MessageTemplate::BoardEmpty => "board_empty.txt",
            MessageTemplate::BoardUnavailable => "board_unavailable.txt",
            MessageTemplate::Profile => "profile.txt",
            MessageTemplate::ProfileNeverPlayed => "profile_never_played.txt",
            MessageTemplate::ProfileUnavailable => "profile_unavailable.txt",
        }
    }

    pub fn get(&self) -> Template<'_, '_> {
        TEMPLATES_ENVIRONMENT.get_template(self.name()).unwrap()
    }

    pub fn template(&self) -> &'static str {
        // \n\ at each code line end creates a line break at the proper position and discards further spaces in this line of code.
        // \x20 (hex; 32 in decimal) is an ASCII space and an indicator for the first space to be preserved in this line of the string.
        match self {
            MessageTemplate::Help => {
                "🎮 *Game bot handbook*\n\n\
                👉 🚀 *Ready to dodge?*\n\
                ```!play```\n\
                Your personal link to launch the game.\n\n\
                👉 🏆 *Show me the board!*\n\
                ```!board```\n\
                Top 10 players, plus your own spot when you rank beyond them.\n\n\
                👉 👤 *How am I doing?*\n\
                ```!profile```\n\
                Your best score and when you last played.\n\n\
                👉 🆘 *How to*\n\
                ```!help```\n\
                You're currently reading this. Good luck! 🍀"
            }
            MessageTemplate::GameLink => {
                "Hey *{{ name }}*!\n\n\
                Ready to dodge? 😉\n\
                🚀 <{{ url }}|Launch the game> and claim your spot on the board!"
            }
            MessageTemplate::Board => {
                "🏆 *LEADERBOARD* 🏆\n\
                {%- for entry in entries %}\n\
                {{ loop.index }}. {% if entry.id == viewer_id %}👉 *{{ entry.name }}*{% else %}{{ entry.name }}{% endif %}: {{ entry.max_score }} pts\
                {%- endfor %}\n\
                {%- if off_board %}\n\n\
                Your spot:\n\
                {{ off_board.rank }}. *{{ off_board.name }}*: {{ off_board.max_score }} pts\
                {%- elif never_played %}\n\n\
                No spot on the board yet. Play a round to claim one!\
                {%- endif %}"
            }
            MessageTemplate::BoardEmpty => {
                "The leaderboard is empty! Be the first to set a record! 🏆"
            }
            MessageTemplate::BoardUnavailable => {
                "Could not reach the leaderboard. Please try again later."
            }
            MessageTemplate::Profile => {
                "👤 *Player profile*\n\n\
                Name: {{ name }}\n\
                ID: {{ id }}\n\n\
                📊 *Statistics:*\n\
                Best score: {{ max_score }} pts\n\
                Last played: {{ last_played }}\n\n\
                Type `!play` to start a new game!"
            }
            MessageTemplate::ProfileNeverPlayed => {
                "👤 *Player profile*\n\n\
                Name: {{ name }}\n\
                ID: {{ id }}\n\n\
                You haven't played yet. Type `!play` to start!"
            }
            MessageTemplate::ProfileUnavailable => {
                "Could not fetch your profile data. Please try again later."
            }
        }
    }
}
