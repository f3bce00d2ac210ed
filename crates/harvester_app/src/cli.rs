use std::path::PathBuf;

use clap::{ArgAction, Parser};
use harvester_core::{InvocationArgs, OutputFormat, SizeFilter};

#[derive(Debug, Parser)]
#[command(
    name = "harvester",
    version,
    about = "Collects the results of an image search into a local directory"
)]
pub struct Cli {
    /// Image search query
    #[arg(short, long)]
    pub query: String,

    /// Seconds to wait between actions that need the page to settle
    #[arg(short = 't', long = "time-sleep", value_name = "SECONDS")]
    pub time_sleep: f64,

    /// Existing directory that receives the images
    #[arg(short = 'o', long = "output-directory", value_name = "DIR")]
    pub output_directory: PathBuf,

    /// Number of images to collect
    #[arg(short = 'n', long = "num-images", value_name = "COUNT")]
    pub num_images: u64,

    /// Convert every image to this format [jpg, jpeg, png, tiff]
    #[arg(short = 'f', long = "image-format", value_name = "FORMAT")]
    pub image_format: Option<OutputFormat>,

    /// Restrict results to one size bucket [large, medium, icon]
    #[arg(short = 's', long = "size-images", value_name = "SIZE")]
    pub size_images: Option<SizeFilter>,

    /// Resize every image to WIDTH HEIGHT
    #[arg(short, long, num_args = 1.., value_name = "PX")]
    pub resize: Option<Vec<u32>>,

    /// Attach to a running browser's DevTools websocket instead of launching one
    #[arg(long, value_name = "WS_URL")]
    pub browser_url: Option<String>,

    /// RON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Keep log lines off the terminal (they still go to --log-file)
    #[arg(long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,
}

impl Cli {
    pub fn invocation(&self) -> InvocationArgs {
        InvocationArgs {
            query: self.query.clone(),
            wait_unit_secs: self.time_sleep,
            output_dir: self.output_directory.clone(),
            target_count: self.num_images,
            output_format: self.image_format,
            size_filter: self.size_images,
            resize: self.resize.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_full_short_form() {
        let cli = Cli::try_parse_from([
            "harvester", "-q", "red panda", "-t", "0.5", "-o", "out", "-n", "12", "-f", "PNG",
            "-s", "icon", "-r", "64", "48",
        ])
        .unwrap();

        let args = cli.invocation();
        assert_eq!(args.query, "red panda");
        assert_eq!(args.wait_unit_secs, 0.5);
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.target_count, 12);
        assert_eq!(args.output_format, Some(OutputFormat::Png));
        assert_eq!(args.size_filter, Some(SizeFilter::Icon));
        assert_eq!(args.resize, Some(vec![64, 48]));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.headed);
    }

    #[test]
    fn optional_flags_default_to_absent() {
        let cli = Cli::try_parse_from([
            "harvester",
            "--query",
            "owl",
            "--time-sleep",
            "1",
            "--output-directory",
            "out",
            "--num-images",
            "3",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.image_format, None);
        assert_eq!(cli.size_images, None);
        assert_eq!(cli.resize, None);
        assert_eq!(cli.browser_url, None);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_format_and_missing_query() {
        let unknown = Cli::try_parse_from([
            "harvester", "-q", "owl", "-t", "1", "-o", "out", "-n", "3", "-f", "gif",
        ]);
        assert!(unknown.is_err());

        let missing = Cli::try_parse_from(["harvester", "-t", "1", "-o", "out", "-n", "3"]);
        assert!(missing.is_err());
    }

    #[test]
    fn single_resize_value_is_left_for_validation() {
        let cli = Cli::try_parse_from([
            "harvester", "-q", "owl", "-t", "1", "-o", "out", "-n", "3", "-r", "64",
        ])
        .unwrap();
        assert_eq!(cli.invocation().resize, Some(vec![64]));
    }
}
