use anyhow::Result;

use crate::cache::DatasetCache;
use crate::cli::{Cli, RenderArgs, SourceArgs};
use crate::config::ChoroplethConfig;
use crate::choropleth::Choropleth;

/// Settings from `--config`, with CLI flags layered on top.
fn load_config(args: &SourceArgs) -> Result<ChoroplethConfig> {
    let mut config = ChoroplethConfig::load(args.config.as_deref())?;
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    Ok(config)
}

pub fn metrics(cli: &Cli, args: &SourceArgs) -> Result<()> {
    let config = load_config(args)?;
    let mut cache = DatasetCache::new();
    let geometry = cache.geometry(&args.geometry)?;
    let table = cache.table(&args.data, config.delimiter_byte()?)?;

    if cli.verbose > 0 {
        eprintln!("[metrics] geometry={} data={}", args.geometry.display(), args.data.display());
    }

    let (keys, selection) = Choropleth::new(config).resolve(&geometry, &table);

    println!("geometry key: {} ({})", keys.geo_key, keys.geo_match);
    println!("table key:    {} ({})", keys.data_key, keys.data_match);
    if keys.used_fallback() {
        println!("warning: join key chosen by fallback; regions may not match");
    }
    for (i, metric) in selection.metrics.iter().enumerate() {
        let marker = if i == selection.default_index { " (default)" } else { "" };
        println!("  {metric}{marker}");
    }
    if !selection.numeric {
        println!("warning: no numeric column found");
    }

    Ok(())
}

pub fn render(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let mut cache = DatasetCache::new();
    let geometry = cache.geometry(&args.source.geometry)?;
    let table = cache.table(&args.source.data, config.delimiter_byte()?)?;

    if cli.verbose > 0 {
        eprintln!(
            "[render] geometry={} data={} -> {}",
            args.source.geometry.display(),
            args.source.data.display(),
            args.output.display()
        );
    }

    let rendered = Choropleth::new(config).render(&geometry, &table, args.metric.as_deref())?;
    rendered.features.write_geojson(&args.output)?;

    if let Some(svg) = &args.svg {
        rendered.to_svg_with_width(svg, args.width)?;
    }

    if rendered.used_key_fallback() {
        println!(
            "warning: join key chosen by fallback ({} ~ {}); regions may not match",
            rendered.keys.geo_key, rendered.keys.data_key
        );
    }
    let vp = rendered.viewport;
    println!("viewport: lat={} lon={} zoom={}", vp.latitude, vp.longitude, vp.zoom);
    println!("matched: {}/{} regions", rendered.matched, rendered.features.len());
    println!("{}", rendered.legend());

    Ok(())
}
