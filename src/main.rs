use anyhow::Context;
use iris_bench::BenchConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = BenchConfig::default();
    let report = iris_bench::run(&config)
        .with_context(|| format!("benchmark on {} failed", config.data_path.display()))?;

    println!("Test accuracy: {}", report.test.accuracy);
    Ok(())
}
