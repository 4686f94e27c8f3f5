use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Iterator;

const COMMANDS: [&'static str; 4] = ["!help", "!play", "!board", "!profile"];
// All words, with optional "!" prefix
static REGEX_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"!?\w+").unwrap());

#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Play,
    Board,
    Profile,
}

impl Command {
    pub fn is_command(input: &str) -> bool {
        REGEX_WORDS
            .find_iter(&input)
            .map(|mat| mat.as_str())
            .next()
            .and_then(|start_with| Some(COMMANDS.contains(&start_with)))
            .unwrap_or_default()
    }

    // Note that we call this command on matching command strings, so we know
    // input string is a command. We might want to return Option<Command> later on.
    pub fn build_from(input: String) -> Command {
        let mut input = REGEX_WORDS.find_iter(&input).map(|mat| mat.as_str());
        // Here we know it's safe to unwrap, as we pass only valid commands.
        // That might change in the future.
        let start_with = input.next().unwrap();
        match start_with {
            cmd if cmd == COMMANDS[0] => Command::Help,
            cmd if cmd == COMMANDS[1] => Command::Play,
            cmd if cmd == COMMANDS[2] => Command::Board,
            cmd if cmd == COMMANDS[3] => Command::Profile,
            _ => unreachable!(),
        }
    }
}
