use rosen::gtfs::{self, GtfsLoader};
use std::{fs, io::Write};

fn write_feed(dir: &std::path::Path) {
    fs::write(
        dir.join("stops.txt"),
        "stop_id,stop_name,stop_lat,stop_lon,platform_code,zone_id\n\
         S1,Tenjin,33.5902,130.4017,1,Z1\n\
         S2,Hakata,33.5897,130.4207,,Z1\n",
    )
    .unwrap();
    fs::write(
        dir.join("routes.txt"),
        "route_id,route_short_name,route_color,jp_office_id\n\
         R1,100,ff0000,O1\n\
         R2,200,,O1\n",
    )
    .unwrap();
    fs::write(
        dir.join("trips.txt"),
        "route_id,service_id,trip_id,trip_headsign,jp_office_id,jp_pattern_id\n\
         R1,WD,T1,Hakata Station,O1,P1\n",
    )
    .unwrap();
    fs::write(
        dir.join("stop_times.txt"),
        "trip_id,departure_time,stop_id,stop_sequence\n\
         T1,08:00:00,S1,1\n\
         T1,08:05:00,S2,2\n",
    )
    .unwrap();
    fs::write(
        dir.join("office_jp.txt"),
        "office_id,office_name\nO1,Main Office\n",
    )
    .unwrap();
}

#[test]
fn load_from_dir_test() {
    let dir = tempfile::tempdir().unwrap();
    write_feed(dir.path());

    let data = GtfsLoader::new(gtfs::Config::default())
        .load_from_dir(dir.path())
        .unwrap();

    assert_eq!(data.stops.len(), 2);
    assert_eq!(data.stops[0].stop_id, "S1");
    assert_eq!(data.stops[0].stop_lat, 33.5902);
    assert_eq!(data.stops[0].platform_code.as_deref(), Some("1"));
    assert_eq!(data.stops[1].platform_code, None);

    assert_eq!(data.routes.len(), 2);
    assert_eq!(data.routes[0].route_color.as_deref(), Some("ff0000"));

    assert_eq!(data.trips.len(), 1);
    assert_eq!(data.trips[0].trip_headsign, "Hakata Station");

    assert_eq!(data.stop_times.len(), 2);
    assert_eq!(data.offices.len(), 1);
}

#[test]
fn missing_tables_load_as_empty_test() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("stops.txt"),
        "stop_id,stop_name,stop_lat,stop_lon\nS1,Tenjin,33.5902,130.4017\n",
    )
    .unwrap();

    let data = GtfsLoader::new(gtfs::Config::default())
        .load_from_dir(dir.path())
        .unwrap();

    assert_eq!(data.stops.len(), 1);
    assert!(data.routes.is_empty());
    assert!(data.trips.is_empty());
    assert!(data.stop_times.is_empty());
    assert!(data.calendar.is_empty());
    assert!(data.calendar_dates.is_empty());
    assert!(data.offices.is_empty());
    assert!(data.patterns.is_empty());
}

#[test]
fn optional_columns_default_test() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("trips.txt"),
        "route_id,service_id,trip_id\nR1,WD,T1\n",
    )
    .unwrap();

    let data = GtfsLoader::new(gtfs::Config::default())
        .load_from_dir(dir.path())
        .unwrap();

    assert_eq!(data.trips[0].trip_headsign, "");
    assert_eq!(data.trips[0].jp_office_id, "");
    assert_eq!(data.trips[0].jp_pattern_id, "");
}

#[test]
fn load_auto_detects_dir_test() {
    let dir = tempfile::tempdir().unwrap();
    write_feed(dir.path());

    let data = GtfsLoader::new(gtfs::Config::default())
        .load(dir.path())
        .unwrap();
    assert_eq!(data.stops.len(), 2);
}

#[test]
fn load_from_zip_test() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("feed.zip");
    let file = fs::File::create(&zip_path).unwrap();
    let mut archive = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    archive.start_file("stops.txt", options).unwrap();
    archive
        .write_all(b"stop_id,stop_name,stop_lat,stop_lon\nS1,Tenjin,33.5902,130.4017\n")
        .unwrap();
    archive.start_file("routes.txt", options).unwrap();
    archive
        .write_all(b"route_id,route_short_name\nR1,100\n")
        .unwrap();
    archive.finish().unwrap();

    let data = GtfsLoader::new(gtfs::Config::default())
        .load(&zip_path)
        .unwrap();
    assert_eq!(data.stops.len(), 1);
    assert_eq!(data.routes.len(), 1);
    // Tables absent from the archive are tolerated the same as on disk.
    assert!(data.trips.is_empty());
}
