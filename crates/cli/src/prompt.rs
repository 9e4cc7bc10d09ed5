//! Line-oriented terminal input.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one trimmed line. `None` means stdin closed.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        print!("{question} ");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Ask for a 1-based choice among `count` items. Returns the raw answer
    /// when it is not a number in range.
    pub async fn choose(&mut self, question: &str, count: usize) -> anyhow::Result<Choice> {
        let Some(answer) = self.ask(question).await? else {
            return Ok(Choice::Quit);
        };
        Ok(parse_choice(&answer, count))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Choice {
    Index(usize),
    Other(String),
    Quit,
}

fn parse_choice(answer: &str, count: usize) -> Choice {
    match answer {
        "q" | "quit" => Choice::Quit,
        _ => match answer.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Choice::Index(n - 1),
            _ => Choice::Other(answer.to_string()),
        },
    }
}
