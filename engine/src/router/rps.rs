//! Rock, paper, scissors round resolver

use rand::Rng;
use sdk::errors::CommandError;

/// Prompt returned by `play rps`.
pub const PROMPT: &str = "Rock, Paper, or Scissors? (type your choice)";

const CHOICE_LIST: &str = "'rock', 'paper', or 'scissors'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Trimmed, case-insensitive parse.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "rock" => Some(Choice::Rock),
            "paper" => Some(Choice::Paper),
            "scissors" => Some(Choice::Scissors),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Scissors, Choice::Paper)
                | (Choice::Paper, Choice::Rock)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub fn decide(player: Choice, engine: Choice) -> Self {
        if player == engine {
            Outcome::Tie
        } else if player.beats(engine) {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Win => "You win!",
            Outcome::Lose => "You lose!",
            Outcome::Tie => "It's a tie!",
        }
    }
}

/// Resolve one round. An invalid choice leaves the round open.
pub fn resolve_round<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Result<String, CommandError> {
    let player = Choice::parse(input).ok_or(CommandError::InvalidChoice(CHOICE_LIST))?;
    let engine = Choice::ALL[rng.gen_range(0..Choice::ALL.len())];
    let outcome = Outcome::decide(player, engine);

    Ok(format!(
        "You chose {}. I chose {}. {}",
        player.as_str(),
        engine.as_str(),
        outcome.message()
    ))
}
