use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use image_palette_wasm::{AnalyzerConfig, Catalog, Recommender, analyze_bytes};
use anyhow::Context;
use anyhow::Result;
use log::info;

/// Extract dominant colors from images and recommend colors for a mood.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dominant-color palette of one or more images as JSON
    Analyze {
        /// One or more input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// JSON file with analyzer settings; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Longest side of the working image
        #[arg(long)]
        max_dimension: Option<u32>,

        /// Pixels sampled for choosing the number of colors
        #[arg(long)]
        sample_size: Option<usize>,

        /// Largest number of colors to consider
        #[arg(short = 'k', long)]
        k_max: Option<usize>,

        /// Seed for sampling and centroid initialisation
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write `<stem>.json` files here instead of printing
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,
    },
    /// Rank catalog colors against a mood description
    Recommend {
        /// Semicolon-separated catalog (Mood;Tema;Suasana;Kontras;Nama Warna;Kode Warna)
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long, default_value = "")]
        mood: String,

        #[arg(long, default_value = "")]
        tema: String,

        #[arg(long, default_value = "")]
        suasana: String,

        #[arg(long, default_value = "")]
        kontras: String,

        /// Number of colors to return
        #[arg(short = 'n', long, default_value_t = 5)]
        top: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Analyze {
            inputs,
            config,
            max_dimension,
            sample_size,
            k_max,
            seed,
            out_dir,
        } => {
            let mut settings = match &config {
                Some(path) => AnalyzerConfig::from_json_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => AnalyzerConfig::default(),
            };
            if let Some(v) = max_dimension {
                settings.max_dimension = v;
            }
            if let Some(v) = sample_size {
                settings.sample_size = v;
            }
            if let Some(v) = k_max {
                settings.k_max = v;
            }
            if let Some(v) = seed {
                settings.seed = v;
            }
            settings.validate().context("invalid analyzer settings")?;

            for input in &inputs {
                let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
                let palette = analyze_bytes(&bytes, &settings)
                    .with_context(|| format!("analysing {}", input.display()))?;
                let json = serde_json::to_string_pretty(&palette)?;

                match &out_dir {
                    Some(dir) => {
                        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                        let out_path = dir.join(format!("{stem}.json"));
                        fs::create_dir_all(dir)?;
                        fs::write(&out_path, json)?;
                        println!("Saved → {}", out_path.display());
                    }
                    None => println!("{json}"),
                }
            }
        }
        Command::Recommend {
            catalog,
            mood,
            tema,
            suasana,
            kontras,
            top,
        } => {
            let colors = Catalog::from_path(&catalog)
                .with_context(|| format!("loading catalog {}", catalog.display()))?;
            let recommender = Recommender::new(colors).with_top_n(top);
            info!("loaded {} catalog colors", recommender.catalog().len());
            let picks = recommender
                .recommend(&mood, &tema, &suasana, &kontras)
                .context("recommendation failed")?;
            println!("{}", serde_json::to_string_pretty(&picks)?);
        }
    }

    Ok(())
}
