/// Available commands, argument parsing and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  /// Placeholder for the argument, if the command takes one
  pub argument: Option<&'static str>,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "pokedex",
    aliases: &["p", "dex", "list"],
    description: "Browse the national dex",
    argument: None,
  },
  Command {
    name: "type",
    aliases: &["t", "types"],
    description: "Pokemon of a type",
    argument: Some("<name>"),
  },
  Command {
    name: "stats",
    aliases: &["cache"],
    description: "Show cache statistics",
    argument: None,
  },
  Command {
    name: "clear",
    aliases: &["purge"],
    description: "Purge the response cache",
    argument: None,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit dexterm",
    argument: None,
  },
];

/// A fully parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  Pokedex,
  Type(String),
  Stats,
  ClearCache,
  Quit,
}

/// Parse a submitted command line such as `type fire`.
///
/// The command word is resolved through the same matching as the
/// suggestions, so `t fire` and `typ fire` work too.
pub fn parse(input: &str) -> Result<Action, String> {
  let mut words = input.split_whitespace();
  let word = words.next().ok_or_else(|| "empty command".to_string())?;
  let argument = words.collect::<Vec<_>>().join("-").to_lowercase();

  let command = get_suggestions(word)
    .into_iter()
    .next()
    .ok_or_else(|| format!("unknown command: {}", word))?;

  match command.name {
    "pokedex" => Ok(Action::Pokedex),
    "type" if argument.is_empty() => Err("usage: type <name>".to_string()),
    "type" => Ok(Action::Type(argument)),
    "stats" => Ok(Action::Stats),
    "clear" => Ok(Action::ClearCache),
    "quit" => Ok(Action::Quit),
    other => Err(format!("unknown command: {}", other)),
  }
}

/// Get autocomplete suggestions for the command word of `input`
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input
    .split_whitespace()
    .next()
    .unwrap_or_default()
    .to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority, stable so declaration order breaks ties
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("stats");
    assert_eq!(suggestions[0].name, "stats");
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(get_suggestions("q")[0].name, "quit");
    assert_eq!(get_suggestions("dex")[0].name, "pokedex");
  }

  #[test]
  fn test_prefix_match() {
    assert_eq!(get_suggestions("cl")[0].name, "clear");
  }

  #[test]
  fn test_fuzzy_match() {
    assert_eq!(get_suggestions("dex")[0].name, "pokedex");
    assert_eq!(get_suggestions("urg")[0].name, "clear");
  }

  #[test]
  fn test_suggestions_ignore_argument() {
    let suggestions = get_suggestions("type fire");
    assert_eq!(suggestions[0].name, "type");
  }

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse("stats"), Ok(Action::Stats));
    assert_eq!(parse("  clear "), Ok(Action::ClearCache));
    assert_eq!(parse("exit"), Ok(Action::Quit));
    assert_eq!(parse("p"), Ok(Action::Pokedex));
  }

  #[test]
  fn test_parse_type_argument() {
    assert_eq!(parse("type Fire"), Ok(Action::Type("fire".to_string())));
    assert_eq!(parse("t water"), Ok(Action::Type("water".to_string())));
    assert!(parse("type").is_err());
  }

  #[test]
  fn test_parse_unknown() {
    assert_eq!(parse("zzz"), Err("unknown command: zzz".to_string()));
    assert!(parse("   ").is_err());
  }
}
