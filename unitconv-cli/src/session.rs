//! Interactive session
//!
//! Holds the user's selections (category, source unit, target unit, value)
//! and turns one input line into one reply. The engine is called only by
//! `convert`; every other command just edits or shows the selections.

use tracing::debug;
use unitconv_core::{ConvertError, Result};
use unitconv_units::ConversionTable;
use crate::config::Config;
use crate::render;

pub const HELP: &str = "\
Commands:
  categories | cats             list categories
  category <name|#> | cat       select a category (resets units)
  units | u                     list units of the current category
  from <name|#>                 select the source unit
  to <name|#>                   select the target unit
  value <number> | v            set the value (1,000.5 and 1_000 are accepted)
  swap                          exchange source and target units
  convert | =                   convert and draw the comparison chart
  status | show                 show current selections
  about                         categories and unit counts
  help | ?                      this text
  quit | exit | q               leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Categories,
    Category(String),
    Units,
    From(String),
    To(String),
    Value(String),
    Swap,
    Convert,
    Status,
    About,
    Help,
    Quit,
}

impl Command {
    /// Parse a line; `None` for a blank line
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "categories" | "cats" => Command::Categories,
            "category" | "cat" => Command::Category(required(rest, "category <name|#>")?),
            "units" | "u" => Command::Units,
            "from" => Command::From(required(rest, "from <unit name|#>")?),
            "to" => Command::To(required(rest, "to <unit name|#>")?),
            "value" | "v" => Command::Value(required(rest, "value <number>")?),
            "swap" => Command::Swap,
            "convert" | "=" => Command::Convert,
            "status" | "show" => Command::Status,
            "about" => Command::About,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(ConvertError::invalid_input(format!(
                    "unknown command '{}', type 'help' for the list",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

fn required(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        Err(ConvertError::invalid_input(format!("usage: {}", usage)))
    } else {
        Ok(arg.to_string())
    }
}

/// Parse a user-typed number, allowing `,` `_` and space between digit groups
pub fn parse_value(text: &str) -> Result<f64> {
    let cleaned = strip_group_separators(text)
        .ok_or_else(|| ConvertError::invalid_input(format!("'{}' has misplaced digit separators", text)))?;
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(ConvertError::invalid_input(format!("'{}' is not a finite number", text))),
        Err(_) => Err(ConvertError::invalid_input(format!("'{}' is not a number", text))),
    }
}

/// Drop thousands separators; each one must follow a digit of the integer
/// part and precede exactly three digits. `None` if one is misplaced.
fn strip_group_separators(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    let mut in_integer = true;

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, ',' | '_' | ' ') {
            let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let group = chars[i + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
            if !in_integer || !after_digit || group != 3 {
                return None;
            }
            continue;
        }
        if matches!(c, '.' | 'e' | 'E') {
            in_integer = false;
        }
        cleaned.push(c);
    }
    Some(cleaned)
}

/// Pick a name by 1-based position, exact match, then case-insensitive match
fn select<'a>(names: &[&'a str], wanted: &str) -> Option<&'a str> {
    if let Ok(n) = wanted.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| names.get(i)).copied();
    }
    names
        .iter()
        .find(|n| **n == wanted)
        .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(wanted)))
        .copied()
}

/// Response to one input line
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply { text: text.into(), quit: false }
    }
}

/// User selections over a conversion table
pub struct Session<'t> {
    table: &'t ConversionTable,
    decimals: usize,
    chart_width: usize,
    category: String,
    from: String,
    to: String,
    value: f64,
}

impl<'t> Session<'t> {
    /// Start on the first category with both units on its first unit and value 1
    pub fn new(table: &'t ConversionTable, config: &Config) -> Result<Self> {
        let first = table
            .iter()
            .next()
            .ok_or_else(|| ConvertError::invalid_table("table has no categories"))?;
        let unit = first
            .units()
            .first()
            .ok_or_else(|| ConvertError::invalid_table(format!("category '{}' has no units", first.name())))?;

        Ok(Session {
            table,
            decimals: config.decimals,
            chart_width: config.chart_width,
            category: first.name().to_string(),
            from: unit.name.clone(),
            to: unit.name.clone(),
            value: 1.0,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn from_unit(&self) -> &str {
        &self.from
    }

    pub fn to_unit(&self) -> &str {
        &self.to
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Handle one input line
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let Some(command) = Command::parse(line)? else {
            return Ok(Reply::text(""));
        };
        debug!(?command, "executing");

        match command {
            Command::Categories => Ok(Reply::text(self.list_categories())),
            Command::Category(name) => {
                self.select_category(&name)?;
                Ok(Reply::text(format!("Category: {} ({} -> {})", self.category, self.from, self.to)))
            }
            Command::Units => Ok(Reply::text(self.list_units()?)),
            Command::From(name) => {
                self.from = self.select_unit(&name)?;
                Ok(Reply::text(format!("From: {}", self.from)))
            }
            Command::To(name) => {
                self.to = self.select_unit(&name)?;
                Ok(Reply::text(format!("To: {}", self.to)))
            }
            Command::Value(text) => {
                self.value = parse_value(&text)?;
                Ok(Reply::text(format!("Value: {}", render::format_grouped(self.value, self.decimals))))
            }
            Command::Swap => {
                std::mem::swap(&mut self.from, &mut self.to);
                Ok(Reply::text(format!("From: {}, To: {}", self.from, self.to)))
            }
            Command::Convert => Ok(Reply::text(self.convert()?)),
            Command::Status => Ok(Reply::text(self.status())),
            Command::About => Ok(Reply::text(self.about())),
            Command::Help => Ok(Reply::text(HELP)),
            Command::Quit => Ok(Reply { text: "Bye.".to_string(), quit: true }),
        }
    }

    fn select_category(&mut self, wanted: &str) -> Result<()> {
        let table = self.table;
        let names = table.categories();
        let name = select(&names, wanted).ok_or_else(|| ConvertError::unknown_category(wanted))?;
        let first_unit = table
            .units(name)?
            .first()
            .map(|u| u.to_string())
            .ok_or_else(|| ConvertError::invalid_table(format!("category '{}' has no units", name)))?;

        self.category = name.to_string();
        self.from = first_unit.clone();
        self.to = first_unit;
        Ok(())
    }

    fn select_unit(&self, wanted: &str) -> Result<String> {
        let names = self.table.units(&self.category)?;
        select(&names, wanted)
            .map(str::to_string)
            .ok_or_else(|| ConvertError::unknown_unit(self.category.as_str(), wanted))
    }

    fn convert(&self) -> Result<String> {
        let result = self.table.convert(&self.category, &self.from, &self.to, self.value)?;
        debug!(
            category = %self.category,
            from = %self.from,
            to = %self.to,
            value = self.value,
            result,
            "converted"
        );

        let line = render::result_line(self.value, &self.from, result, &self.to, self.decimals);
        let chart = render::bar_chart(
            &[(self.from.as_str(), self.value), (self.to.as_str(), result)],
            self.chart_width,
            self.decimals,
        );
        Ok(format!("{}\n\n{}", line, chart.trim_end()))
    }

    fn list_categories(&self) -> String {
        self.table
            .categories()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let marker = if *name == self.category { "*" } else { " " };
                format!("{} {:>2}. {}", marker, i + 1, name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn list_units(&self) -> Result<String> {
        let names = self.table.units(&self.category)?;
        let lines: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let tag = match (*name == self.from, *name == self.to) {
                    (true, true) => " (from, to)",
                    (true, false) => " (from)",
                    (false, true) => " (to)",
                    (false, false) => "",
                };
                format!("{:>3}. {}{}", i + 1, name, tag)
            })
            .collect();
        Ok(format!("{} units:\n{}", self.category, lines.join("\n")))
    }

    fn status(&self) -> String {
        format!(
            "Category: {}\nFrom: {}\nTo: {}\nValue: {}",
            self.category,
            self.from,
            self.to,
            render::format_grouped(self.value, self.decimals)
        )
    }

    fn about(&self) -> String {
        let lines: Vec<String> = self
            .table
            .iter()
            .map(|c| format!("- {} ({} units)", c.name(), c.units().len()))
            .collect();
        format!("Supported categories:\n{}", lines.join("\n"))
    }
}
