use geoguess::Location;

pub const HELP: &str = "\
Commands:
  pick <lat> <lon>  Place your marker
  guess             Submit your marker
  continue          Go to the next round
  retry             Load the image again after a failure
  new               Start a new game
  status            Show the current state
  help              Show this help
  quit              Exit";

/// A user intent typed at the prompt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Pick(Location),
    Guess,
    Continue,
    Retry,
    New,
    Status,
    Help,
    Quit,
}

/// Returns `None` for blank lines.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let mut words = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty());
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let command = match name.to_ascii_lowercase().as_str() {
        "pick" | "p" => {
            let (Some(lat), Some(lon), None) = (words.next(), words.next(), words.next()) else {
                anyhow::bail!("Usage: pick <lat> <lon>");
            };
            let location = Location::new(lat.parse()?, lon.parse()?);
            if !location.is_valid() {
                anyhow::bail!("Latitude must be within ±90 and longitude within ±180");
            }
            return Ok(Some(Command::Pick(location)));
        }
        "guess" | "g" => Command::Guess,
        "continue" | "c" => Command::Continue,
        "retry" | "r" => Command::Retry,
        "new" | "n" => Command::New,
        "status" | "s" => Command::Status,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => anyhow::bail!("Unknown command '{}', type `help` for a list", other),
    };
    if words.next().is_some() {
        anyhow::bail!("'{}' takes no arguments", name);
    }
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pick_with_and_without_comma() {
        assert_eq!(
            parse_command("pick 48.85 2.35").unwrap(),
            Some(Command::Pick(Location::new(48.85, 2.35)))
        );
        assert_eq!(
            parse_command("  p -33.9, 151.2 ").unwrap(),
            Some(Command::Pick(Location::new(-33.9, 151.2)))
        );
    }

    #[test]
    fn rejects_bad_picks() {
        assert!(parse_command("pick 48.85").is_err());
        assert!(parse_command("pick 48.85 2.35 1").is_err());
        assert!(parse_command("pick north 2.35").is_err());
        assert!(parse_command("pick 91 0").is_err());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("GUESS").unwrap(), Some(Command::Guess));
        assert_eq!(parse_command("c").unwrap(), Some(Command::Continue));
        assert_eq!(parse_command("new").unwrap(), Some(Command::New));
        assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("guess now").is_err());
        assert!(parse_command("dance").is_err());
    }
}
