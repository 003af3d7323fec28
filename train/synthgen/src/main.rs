use std::{path::Path, time::Duration};

use anyhow::Context;
use layout::{ClassCatalog, DatasetDirs, LayoutGenerator, SampleOrchestrator};
use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use rand_xoshiro::SplitMix64;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::GenCfg,
    io::{Manifest, PngWriter, write_classes},
    record::JsonRecord,
    render::ControlRenderer,
    schedule::Ticker,
};

mod config;
mod controls;
mod fonts;
mod io;
mod record;
mod render;
mod schedule;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => GenCfg::load(Path::new(&path))?,
        None => GenCfg::default(),
    };
    cfg.validate()?;

    let seed = cfg.seed.unwrap_or_else(|| rand::rng().random());
    let mut seeds = SplitMix64::seed_from_u64(seed);

    let catalog = ClassCatalog::default();
    let renderer = ControlRenderer::new(&catalog, &cfg, seeds.next_u64())?;

    let dirs = DatasetDirs::new(&cfg.out_dir);
    dirs.create()
        .with_context(|| format!("creating dataset dirs under {}", cfg.out_dir.display()))?;
    write_classes(dirs.root(), &catalog).context("writing classes.txt")?;
    let mut manifest = if cfg.write_manifest {
        Some(Manifest::open(dirs.root()).context("opening manifest.jsonl")?)
    } else {
        None
    };

    let mut orch = SampleOrchestrator::new(
        catalog,
        LayoutGenerator::new(cfg.max_attempts, cfg.fallback_margin),
        renderer,
        PngWriter,
        dirs,
    );

    info!(
        seed,
        out_dir = %cfg.out_dir.display(),
        interval_ms = cfg.interval_ms,
        samples = ?cfg.samples,
        "generating dataset"
    );

    let mut ticker = Ticker::new(Duration::from_millis(cfg.interval_ms));
    let mut written = 0u32;
    while cfg.samples.is_none_or(|n| written < n) {
        ticker.wait();

        let sample_seed = seeds.next_u64();
        let mut rng = SmallRng::seed_from_u64(sample_seed);
        let Some(sample) = orch.tick(&mut rng)? else {
            continue;
        };
        written += 1;

        if let Some(m) = manifest.as_mut() {
            if let Err(e) = m.append(&JsonRecord::new(&sample, sample_seed)) {
                warn!(error = %e, stem = %sample.stem, "manifest append failed");
            }
        }
    }

    if let Some(m) = manifest.as_mut() {
        m.finalize().context("flushing manifest.jsonl")?;
    }
    info!(written, "done");
    Ok(())
}
