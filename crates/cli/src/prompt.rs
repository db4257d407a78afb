//! Interactive collection of the inputs `find` needs but was not given on the command line.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use colored::Colorize;
use slotscan_common::ether::{
    address::parse_address,
    chains::{find_chain, Chain, CHAINS},
};

use crate::error::Error;

/// Reads answers line by line from `input` and writes questions to `output`.
///
/// With `skip` set, any question that has a default is answered with it without reading input.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
    skip: bool,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// A prompter bound to the process' stdin and stdout.
    pub(crate) fn stdio(skip: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), skip)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W, skip: bool) -> Self {
        Self { input, output, skip }
    }

    /// Ask which network to use. Accepts an index into the list, a chain name or a chain id.
    pub(crate) fn select_chain(&mut self, default: &str) -> Result<&'static Chain, Error> {
        let default = find_chain(default);
        if let (true, Some(chain)) = (self.skip, default) {
            return Ok(chain);
        }

        writeln!(self.output, "{}", "Select a network:".bold())?;
        for (i, chain) in CHAINS.iter().enumerate() {
            let branch = if i == CHAINS.len() - 1 { "└─" } else { "├─" };
            writeln!(self.output, "  {} {}: {}", branch.bold().bright_white(), i, chain)?;
        }

        loop {
            let hint =
                default.map(|chain| format!(" (default: {})", chain.name)).unwrap_or_default();
            let answer = self.ask(&format!("Network{hint}"))?;

            if answer.is_empty() {
                if let Some(chain) = default {
                    return Ok(chain);
                }
            } else if let Some(chain) = answer
                .parse::<usize>()
                .ok()
                .and_then(|index| CHAINS.get(index))
                .or_else(|| find_chain(&answer))
            {
                return Ok(chain);
            }

            self.error("invalid selection.")?;
        }
    }

    /// Ask for an address until a valid one is entered.
    pub(crate) fn address(&mut self, message: &str) -> Result<String, Error> {
        loop {
            let answer = self.ask(message)?;
            match parse_address(&answer) {
                Ok(_) => return Ok(answer),
                Err(e) => self.error(&e.to_string())?,
            }
        }
    }

    /// Ask a yes/no question.
    pub(crate) fn confirm(&mut self, message: &str, default: bool) -> Result<bool, Error> {
        if self.skip {
            return Ok(default);
        }

        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let answer = self.ask(&format!("{message} ({hint})"))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.error("please answer 'y' or 'n'.")?,
            }
        }
    }

    fn ask(&mut self, message: &str) -> Result<String, Error> {
        write!(self.output, "{}: ", message.bright_white())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Generic(format!("no answer given to '{message}'")));
        }

        Ok(line.trim().to_string())
    }

    fn error(&mut self, message: &str) -> Result<(), Error> {
        writeln!(self.output, "{} {}", "error:".bright_red().bold(), message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str, skip: bool) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new(), skip)
    }

    fn selected(input: &str, default: &str, skip: bool) -> Option<&'static str> {
        prompter(input, skip).select_chain(default).map(|chain| chain.name).ok()
    }

    #[test]
    fn test_select_chain_by_index_name_and_id() {
        assert_eq!(selected("3\n", "ethereum", false), Some("polygon"));
        assert_eq!(selected("base\n", "ethereum", false), Some("base"));
        // indices take precedence over chain ids
        assert_eq!(selected("10\n", "ethereum", false), Some("scroll"));
        assert_eq!(selected("42161\n", "ethereum", false), Some("arbitrum"));
    }

    #[test]
    fn test_select_chain_default() {
        assert_eq!(selected("\n", "gnosis", false), Some("gnosis"));
        assert_eq!(selected("", "base", true), Some("base"));
    }

    #[test]
    fn test_select_chain_retries_invalid_input() {
        let mut prompt = prompter("goerli\n99\n1\n", false);
        assert_eq!(prompt.select_chain("ethereum").map(|c| c.name).ok(), Some("sepolia"));

        let output = String::from_utf8(prompt.output).expect("invalid utf8");
        assert_eq!(output.matches("invalid selection.").count(), 2);
    }

    #[test]
    fn test_select_chain_without_input_fails() {
        assert!(prompter("", false).select_chain("ethereum").is_err());
        // an unknown default can't be skipped
        assert!(prompter("", true).select_chain("goerli").is_err());
    }

    #[test]
    fn test_address_retries_until_valid() {
        let input = [
            "0x1234",
            "0xC02AAa39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        ]
        .join("\n");
        let mut prompt = prompter(&input, false);

        assert_eq!(
            prompt.address("Token address").ok().as_deref(),
            Some("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")
        );
    }

    #[test]
    fn test_address_ignores_skip() {
        assert!(prompter("", true).address("Token address").is_err());
    }

    #[test]
    fn test_confirm() {
        assert_eq!(prompter("\n", false).confirm("Same?", true).ok(), Some(true));
        assert_eq!(prompter("n\n", false).confirm("Same?", true).ok(), Some(false));
        assert_eq!(prompter("maybe\nYES\n", false).confirm("Same?", false).ok(), Some(true));
        assert_eq!(prompter("", true).confirm("Same?", true).ok(), Some(true));
    }
}
