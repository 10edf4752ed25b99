// CLI configuration
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use opustags::{EditPlan, Error};

/// opustags - view and edit Ogg Opus comments
#[derive(Parser, Debug)]
#[command(name = "opustags")]
#[command(about = "View and edit the comments of Ogg Opus files", long_about = None)]
#[command(version)]
pub struct Config {
    /// Input file, or "-" for standard input
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output file, or "-" for standard output
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<String>,

    /// Edit the input in place, through a temporary file named INPUT+SUFFIX
    #[arg(short, long, value_name = "SUFFIX", num_args = 0..=1, default_missing_value = ".otmp")]
    pub in_place: Option<String>,

    /// Replace the output file if it already exists
    #[arg(short = 'y', long)]
    pub overwrite: bool,

    /// Append a comment
    #[arg(short, long, value_name = "FIELD=VALUE")]
    pub add: Vec<String>,

    /// Delete every comment with this field name
    #[arg(short, long, value_name = "FIELD")]
    pub delete: Vec<String>,

    /// Replace the comments of a field, same as --delete FIELD --add FIELD=VALUE
    #[arg(short, long, value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Delete every comment
    #[arg(short = 'D', long)]
    pub delete_all: bool,

    /// Replace all comments by those read from standard input, one per line
    #[arg(short = 'S', long)]
    pub set_all: bool,

    /// Format used to list comments
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Show more details (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for comment listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One NAME=value per line
    #[default]
    Pretty,
    /// JSON object with vendor, comments and extra data
    Json,
}

/// Where the edited stream goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Nothing is written, the comments are listed
    List,
    Stdout,
    File { path: PathBuf, overwrite: bool },
    InPlace { temporary: PathBuf, overwrite: bool },
}

impl Config {
    /// Whether any editing flag was given
    pub fn has_edits(&self) -> bool {
        !self.add.is_empty() || !self.delete.is_empty() || !self.set.is_empty() || self.delete_all || self.set_all
    }

    /// Check the options against each other and pick the destination
    pub fn destination(&self) -> Result<Destination, Error> {
        let from_stdin = self.input == "-";
        if self.set_all && from_stdin {
            return Err(Error::bad_arguments(
                "--set-all reads comments from standard input, which already carries the stream",
            ));
        }

        if let Some(suffix) = &self.in_place {
            if from_stdin {
                return Err(Error::bad_arguments("cannot edit standard input in place"));
            }
            if suffix.is_empty() {
                return Err(Error::bad_arguments("in-place suffix must not be empty"));
            }
            return Ok(Destination::InPlace {
                temporary: PathBuf::from(format!("{}{}", self.input, suffix)),
                overwrite: self.overwrite,
            });
        }

        match self.output.as_deref() {
            Some("-") => Ok(Destination::Stdout),
            Some(output) => {
                let path = PathBuf::from(output);
                if !from_stdin && same_file(Path::new(&self.input), &path) {
                    return Err(Error::bad_arguments(
                        "output file is the input file, use --in-place instead",
                    ));
                }
                if !self.overwrite && path.exists() {
                    return Err(Error::bad_arguments(format!(
                        "'{}' already exists, use --overwrite to replace it",
                        output
                    )));
                }
                Ok(Destination::File {
                    path,
                    overwrite: self.overwrite,
                })
            }
            None if self.has_edits() => Err(Error::bad_arguments(
                "editing needs a destination, use --output or --in-place",
            )),
            None => Ok(Destination::List),
        }
    }

    /// Gather the editing flags into a plan
    ///
    /// `replacement` holds the comments read for --set-all.
    pub fn edit_plan(&self, replacement: Vec<String>) -> EditPlan {
        let mut deletions = self.delete.clone();
        // A --set value without '=' is left to plan validation to reject
        deletions.extend(
            self.set
                .iter()
                .map(|c| c.split_once('=').map_or(c.as_str(), |(name, _)| name).to_string()),
        );

        let mut additions = replacement;
        additions.extend(self.add.iter().cloned());
        additions.extend(self.set.iter().cloned());

        EditPlan {
            additions,
            deletions,
            delete_all: self.delete_all,
            set_all: self.set_all,
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("opustags").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_list_without_edits() {
        let config = parse(&["in.opus"]);
        assert_eq!(config.destination().unwrap(), Destination::List);
        assert!(config.edit_plan(Vec::new()).is_empty());
    }

    #[test]
    fn test_edits_need_destination() {
        let config = parse(&["in.opus", "-a", "TITLE=x"]);
        assert!(matches!(config.destination(), Err(Error::BadArguments(_))));
    }

    #[test]
    fn test_in_place_default_suffix() {
        let config = parse(&["in.opus", "-i", "-d", "TITLE"]);
        assert_eq!(
            config.destination().unwrap(),
            Destination::InPlace {
                temporary: PathBuf::from("in.opus.otmp"),
                overwrite: false
            }
        );

        let config = parse(&["in.opus", "--in-place=.tmp", "-D"]);
        assert!(matches!(
            config.destination().unwrap(),
            Destination::InPlace { temporary, .. } if temporary == PathBuf::from("in.opus.tmp")
        ));
    }

    #[test]
    fn test_output_conflicts() {
        assert!(Config::try_parse_from(["opustags", "in.opus", "-i", "-o", "out.opus"]).is_err());

        let config = parse(&["in.opus", "-o", "in.opus"]);
        assert!(matches!(config.destination(), Err(Error::BadArguments(_))));

        let config = parse(&["-", "-o", "-"]);
        assert_eq!(config.destination().unwrap(), Destination::Stdout);

        let config = parse(&["-", "-i"]);
        assert!(config.destination().is_err());

        let config = parse(&["-", "-S", "-o", "-"]);
        assert!(config.destination().is_err());
    }

    #[test]
    fn test_edit_plan_from_flags() {
        let config = parse(&[
            "in.opus", "-o", "-", "-a", "GENRE=Jazz", "-d", "comment", "-s", "TITLE=New", "-a", "YEAR=1999",
        ]);
        let plan = config.edit_plan(Vec::new());
        assert_eq!(plan.deletions, vec!["comment", "TITLE"]);
        assert_eq!(plan.additions, vec!["GENRE=Jazz", "YEAR=1999", "TITLE=New"]);
        assert!(!plan.delete_all);
    }

    #[test]
    fn test_set_all_plan() {
        let config = parse(&["in.opus", "-S", "-o", "out.opus", "-y"]);
        let plan = config.edit_plan(vec!["A=1".to_string(), "B=2".to_string()]);
        assert!(plan.set_all);
        assert_eq!(plan.additions, vec!["A=1", "B=2"]);
    }
}
