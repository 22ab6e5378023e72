//! Basin file loading, lookup and graph construction.

use std::path::Path;

use bc_core::{UnitSystem, eq_ignore_case};
use bc_graph::{Graph, build_basin_graph};
use bc_project::{Basin, BasinFile, convert_basin_units};
use rayon::prelude::*;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Summary of a basin for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct BasinSummary {
    pub name: String,
    pub office_id: String,
    pub stream_count: usize,
    pub location_count: usize,
    pub reach_count: usize,
}

/// Load and validate a basin file; the format follows the file extension.
pub fn load_basin_file(path: &Path) -> AppResult<BasinFile> {
    if !path.exists() {
        return Err(AppError::BasinFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file = match ext.as_deref() {
        Some("yaml") | Some("yml") => bc_project::load_yaml(path)?,
        Some("json") => bc_project::load_json(path)?,
        _ => {
            return Err(AppError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    info!(path = %path.display(), basins = file.basins.len(), "loaded basin file");
    Ok(file)
}

/// Find a basin by name, ignoring case.
pub fn find_basin<'a>(file: &'a BasinFile, name: &str) -> AppResult<&'a Basin> {
    file.basins
        .iter()
        .find(|b| eq_ignore_case(&b.name, name))
        .ok_or_else(|| AppError::BasinNotFound(name.to_string()))
}

/// List all basins in the file with summaries.
pub fn list_basins(file: &BasinFile) -> Vec<BasinSummary> {
    file.basins
        .iter()
        .map(|basin| BasinSummary {
            name: basin.name.clone(),
            office_id: basin.office_id.clone(),
            stream_count: basin.streams().count(),
            location_count: basin.streams().map(|s| s.locations.len()).sum(),
            reach_count: basin.streams().map(|s| s.reaches.len()).sum(),
        })
        .collect()
}

/// Build a basin's graph, optionally re-expressing it in another unit system first.
pub fn build_graph(basin: &Basin, units: Option<UnitSystem>) -> AppResult<Graph> {
    let graph = match units {
        Some(system) => {
            let converted = convert_basin_units(basin, system)?;
            build_basin_graph(&converted)
        }
        None => build_basin_graph(basin),
    }
    .map_err(|source| AppError::Graph {
        basin: basin.name.clone(),
        source,
    })?;

    info!(
        basin = %basin.name,
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "built graph"
    );
    Ok(graph)
}

/// Build every basin's graph in parallel. Results keep the file's basin order.
pub fn build_all(file: &BasinFile) -> Vec<(String, AppResult<Graph>)> {
    file.basins
        .par_iter()
        .map(|basin| (basin.name.clone(), build_graph(basin, None)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::Bank;
    use bc_project::{Stream, StreamLocation};

    fn file() -> BasinFile {
        BasinFile {
            version: 1,
            basins: vec![
                Basin::new("Keystone", "SWT").with_primary_stream(
                    Stream::new("Arkansas", 100.0, false)
                        .with_location(StreamLocation::new("Ralston", 10.0, Bank::Left))
                        .with_tributary(
                            Stream::new("Cimarron", 20.0, false).joins_at(50.0, Bank::Right),
                        ),
                ),
                Basin::new("Dry", "SWT"),
            ],
        }
    }

    #[test]
    fn find_basin_ignores_case() {
        let file = file();
        assert_eq!(find_basin(&file, "KEYSTONE").unwrap().name, "Keystone");
        assert!(matches!(
            find_basin(&file, "Tulsa"),
            Err(AppError::BasinNotFound(_))
        ));
    }

    #[test]
    fn list_counts_streams_and_locations() {
        let summaries = list_basins(&file());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].stream_count, 2);
        assert_eq!(summaries[0].location_count, 1);
        assert_eq!(summaries[0].reach_count, 0);
        assert_eq!(summaries[1].stream_count, 0);
    }

    #[test]
    fn build_graph_in_other_units() {
        let file = file();
        let keystone = find_basin(&file, "Keystone").unwrap();
        let graph = build_graph(keystone, Some(UnitSystem::Si)).unwrap();
        let top = graph
            .nodes()
            .iter()
            .map(|n| n.station().value())
            .fold(f64::MIN, f64::max);
        assert_eq!(top, 160.9344);
    }

    #[test]
    fn build_all_keeps_order() {
        let results = build_all(&file());
        let names: Vec<&str> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Keystone", "Dry"]);
        assert!(results[1].1.as_ref().unwrap().is_empty());
    }
}
