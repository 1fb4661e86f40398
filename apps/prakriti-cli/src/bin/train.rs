use clap::Parser;
use std::path::PathBuf;

use prakriti_core::config::Config;
use prakriti_core::logging::init_logging;
use prakriti_train::{synthetic, TrainOptions, Trainer};

#[derive(Parser)]
#[command(name = "prakriti-train", about = "Train the prakriti dosha classifier")]
struct Cli {
    /// CSV dataset; overrides `data.dataset_path`.
    #[arg(long)]
    dataset: Option<PathBuf>,

    #[arg(long)]
    model_dir: Option<PathBuf>,

    #[arg(long)]
    outputs_dir: Option<PathBuf>,

    /// Select by stratified k-fold accuracy instead of the test split.
    #[arg(long)]
    cv_folds: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Train on N generated survey rows instead of the CSV dataset.
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging("info");
    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut options = TrainOptions::from_config(&config)?;
    if let Some(p) = cli.dataset { options.dataset_path = p; }
    if let Some(p) = cli.model_dir { options.model_dir = p; }
    if let Some(p) = cli.outputs_dir { options.outputs_dir = p; }
    if let Some(k) = cli.cv_folds {
        if k == 1 { anyhow::bail!("--cv-folds must be 0 (disabled) or >= 2"); }
        options.training.cv_folds = k;
    }
    if let Some(s) = cli.seed { options.training.seed = s; }
    if cli.no_progress { options.training.show_progress = false; }

    println!("Prakriti Classifier Training\n============================");
    let trainer = Trainer::new(options);
    let outcome = match cli.synthetic {
        Some(rows) => {
            println!("🧪 Using {} synthetic survey rows", rows);
            trainer.run_on(synthetic::generate(rows, trainer.options().training.seed)?)?
        }
        None => {
            println!("📂 Dataset: {}", trainer.options().dataset_path.display());
            trainer.run()?
        }
    };

    println!("\n📊 Model comparison:");
    for c in &outcome.candidates {
        let cv = c.cv_accuracy.map(|v| format!("  cv {:.4}", v)).unwrap_or_default();
        println!("   {:<20} train {:.4}  test {:.4}  f1 {:.4}{}", c.model_name, c.train_accuracy, c.test_accuracy, c.f1_score, cv);
    }
    let m = &outcome.metadata;
    println!("\n🏆 Best model: {} (test accuracy {:.4})", m.model_name, m.test_accuracy);
    if !outcome.report.top_features.is_empty() {
        println!("\n🔑 Top features:");
        for f in &outcome.report.top_features { println!("   {:<28} {:.4}", f.feature, f.importance); }
    }
    println!("\n✅ Training completed! Artifacts tagged {}", outcome.saved.timestamp);
    for p in &outcome.saved.latest { println!("   💾 {}", p.display()); }
    println!("   📝 {}", outcome.report_path.display());
    println!("\n💡 To predict, use: cargo run --bin prakriti-predict '<json>'");
    Ok(())
}
