use crate::charts::ChartSpec;
use crate::dashboard::View;
use crate::error::DashboardError;
use crate::types::BarPreviewRow;
use crate::util::format_value;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

fn ensure_parent(path: &Path) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), DashboardError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), DashboardError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    info!("Wrote {}", path.display());
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("({} more rows)", rows.len() - max_rows);
    }
    println!();
}

pub fn bar_rows(chart: &ChartSpec) -> Vec<BarPreviewRow> {
    let y_count = chart.y_field.is_count();
    let hover_count = chart.hover_field.map_or(false, |f| f.is_count());
    chart
        .bars
        .iter()
        .map(|bar| BarPreviewRow {
            category: bar.x.clone(),
            value: format_value(bar.y, y_count),
            hover: if chart.hover_field.is_some() {
                format_value(bar.hover, hover_count)
            } else {
                String::new()
            },
        })
        .collect()
}

pub fn preview_chart(chart: &ChartSpec, max_rows: usize) {
    println!("{}", chart.title);
    println!("(x: {}, y: {})\n", chart.x_title, chart.y_title);
    preview_table_rows(&bar_rows(chart), max_rows);
}

pub fn preview_view(view: &View, max_rows: usize) {
    if let Some(placeholder) = &view.placeholder {
        println!("{}\n", placeholder);
        return;
    }
    for chart in &view.charts {
        preview_chart(chart, max_rows);
    }
}
