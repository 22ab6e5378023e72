//! Re-expressing a basin in another unit system.

use bc_core::{BcError, BcResult, Station, Unit, UnitSystem, convert};

use crate::schema::{Basin, Stream};

/// Return a copy of `basin` with stations, lengths and drainage areas in `system`.
///
/// Every converted value is rounded to [`bc_core::DEFAULT_PRECISION`] places on
/// its own, so two distinct locations on one stream that sit closer than half
/// that step can land on the same station. That is reported as
/// [`BcError::StationCollision`] naming the stream and both locations.
pub fn convert_basin_units(basin: &Basin, system: UnitSystem) -> BcResult<Basin> {
    let mut out = basin.clone();
    let from_distance = basin.station_unit;
    let to_distance = system.distance();
    let from_area = basin.area_unit;
    let to_area = system.area();

    for area in [
        &mut out.total_drainage_area,
        &mut out.contributing_drainage_area,
    ]
    .into_iter()
    .flatten()
    {
        *area = convert(*area, from_area, to_area)?;
    }
    out.area_unit = to_area;

    if let Some(stream) = out.primary_stream.as_mut() {
        convert_stream(stream, from_distance, to_distance)?;
    }
    out.station_unit = to_distance;

    tracing::debug!(basin = %basin.name, %system, "converted basin units");
    Ok(out)
}

fn convert_stream(stream: &mut Stream, from: Unit, to: Unit) -> BcResult<()> {
    stream.length = convert(stream.length, from, to)?;
    for station in [&mut stream.diversion_station, &mut stream.confluence_station]
        .into_iter()
        .flatten()
    {
        *station = convert_station(*station, from, to)?;
    }
    let before: Vec<Station> = stream.locations.iter().map(|l| l.station).collect();
    for location in &mut stream.locations {
        location.station = convert_station(location.station, from, to)?;
        for station in [
            &mut location.published_station,
            &mut location.navigation_station,
        ]
        .into_iter()
        .flatten()
        {
            *station = convert_station(*station, from, to)?;
        }
    }
    ensure_stations_stay_distinct(stream, &before)?;
    for tributary in &mut stream.tributaries {
        convert_stream(tributary, from, to)?;
    }
    Ok(())
}

/// Locations that were apart before rounding must still be apart after it.
fn ensure_stations_stay_distinct(stream: &Stream, before: &[Station]) -> BcResult<()> {
    for (i, first) in stream.locations.iter().enumerate() {
        for (j, second) in stream.locations.iter().enumerate().skip(i + 1) {
            if first.station == second.station && before[i] != before[j] {
                return Err(BcError::StationCollision {
                    stream: stream.id.to_string(),
                    first: first.name.clone(),
                    second: second.name.clone(),
                    station: first.station.value(),
                });
            }
        }
    }
    Ok(())
}

fn convert_station(station: Station, from: Unit, to: Unit) -> BcResult<Station> {
    convert(station.value(), from, to).map(Station::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StreamLocation;
    use bc_core::Bank;

    fn basin() -> Basin {
        let mut basin = Basin::new("Test", "SWT").with_primary_stream(
            Stream::new("Main", 100.0, false)
                .with_location(StreamLocation::new("Gage", 10.0, Bank::Left))
                .with_tributary(Stream::new("Creek", 1.0, false).joins_at(50.0, Bank::Right)),
        );
        basin.total_drainage_area = Some(1.0);
        basin
    }

    #[test]
    fn converts_stations_lengths_and_areas_to_si() {
        let si = convert_basin_units(&basin(), UnitSystem::Si).unwrap();
        assert_eq!(si.station_unit, Unit::Kilometer);
        assert_eq!(si.area_unit, Unit::SquareKilometer);
        assert_eq!(si.total_drainage_area, Some(2.59));

        let main = si.primary_stream.as_ref().unwrap();
        assert_eq!(main.length, 160.9344);
        assert_eq!(main.locations[0].station, Station::new(16.0934));
        let creek = &main.tributaries[0];
        assert_eq!(creek.length, 1.6093);
        assert_eq!(creek.confluence_station, Some(Station::new(80.4672)));
    }

    #[test]
    fn same_system_is_identity() {
        let b = basin();
        assert_eq!(convert_basin_units(&b, UnitSystem::En).unwrap(), b);
    }

    #[test]
    fn locations_merged_by_rounding_are_reported() {
        let mut b = basin();
        let main = b.primary_stream.as_mut().unwrap();
        main.locations = vec![
            StreamLocation::new("Upper Gage", 1.000_01, Bank::Left),
            StreamLocation::new("Lower Gage", 1.000_02, Bank::Right),
        ];
        let err = convert_basin_units(&b, UnitSystem::Si).unwrap_err();
        assert_eq!(
            err,
            BcError::StationCollision {
                stream: "Main".into(),
                first: "Upper Gage".into(),
                second: "Lower Gage".into(),
                station: 1.6094,
            }
        );
    }

    #[test]
    fn shared_station_before_conversion_is_left_to_the_graph() {
        let mut b = basin();
        let main = b.primary_stream.as_mut().unwrap();
        main.locations = vec![
            StreamLocation::new("A", 5.0, Bank::Left),
            StreamLocation::new("B", 5.0, Bank::Right),
        ];
        let si = convert_basin_units(&b, UnitSystem::Si).unwrap();
        let main = si.primary_stream.unwrap();
        assert_eq!(main.locations[0].station, main.locations[1].station);
    }

    #[test]
    fn rejects_mismatched_station_unit() {
        let mut b = basin();
        b.station_unit = Unit::Foot;
        let err = convert_basin_units(&b, UnitSystem::Si).unwrap_err();
        assert!(matches!(err, BcError::IncompatibleUnits { .. }));
    }
}
