// Integration tests for the profile builder

use rcbar_core::{ParameterMap, RcbarError, Validate};
use rcbar_math::DVec3;
use rcbar_profile::{abutment, footing, wall, Extremum, ProfileBuilder, ProfileFamily};

fn abutment_map() -> ParameterMap {
    ParameterMap::new()
        .with("Width", 300)
        .with("Height", 2000)
        .with("FrontHeight", 400)
        .with("ShelfHeight", 250)
        .with("ShelfWidth", 600)
        .with("BackwallWidth", 400)
        .with("CantileverWidth", 300)
        .with("BackwallTopHeight", 300)
        .with("CantileverHeight", 600)
        .with("BackwallBottomHeight", 300)
        .with("SkewHeight", 200)
        .with("Length", 6000)
}

fn wall_map() -> ParameterMap {
    ParameterMap::new()
        .with("Height", 3000)
        .with("BaseWidth", 2000)
        .with("BaseHeight", 400)
        .with("ToeWidth", 500)
        .with("ToeHeight", 300)
        .with("StemWidthTop", 250)
        .with("StemWidthBottom", 400)
        .with("Length", 8000)
}

fn footing_map() -> ParameterMap {
    ParameterMap::new()
        .with("Width", 3000)
        .with("Height", 900)
        .with("EdgeHeight", 400)
        .with("TopWidth", 800)
        .with("Length", 5000)
}

#[test]
fn translation_symmetry_is_exact() {
    for (family, map) in [
        (ProfileFamily::Abutment, abutment_map()),
        (ProfileFamily::RetainingWall, wall_map()),
        (ProfileFamily::WingWall, wall_map()),
        (ProfileFamily::Footing, footing_map()),
    ] {
        let model = ProfileBuilder::build(family, &map).unwrap();
        let length = model.length();
        let (s0, s1) = (model.station(0), model.station(1));
        for k in 0..s0.len() {
            assert_eq!(s1[k], s0[k] + DVec3::new(length, 0.0, 0.0), "{family} vertex {k}");
        }
    }
}

#[test]
fn stations_share_cardinality() {
    let map = footing_map()
        .with("Lengths", "3000;2500;4000")
        .with("Heights", "900;1100;900;1000")
        .with("HorizontalOffsets", "100;-50;0")
        .with("VerticalOffsets", "0;200;0");
    let model = ProfileBuilder::build(ProfileFamily::Footing, &map).unwrap();
    assert_eq!(model.station_count(), 4);
    for station in model.stations() {
        assert_eq!(station.len(), footing::CARDINALITY);
    }
    model.validate().unwrap();

    let xs: Vec<f64> = model.stations().iter().map(|s| s.x()).collect();
    assert_eq!(xs, vec![0.0, 3000.0, 5500.0, 9500.0]);
}

#[test]
fn three_station_chain_accumulates_offsets() {
    let (h0, h1) = (300.0, 120.0);
    let map = footing_map()
        .with("Lengths", "3000;3000")
        .with("HorizontalOffsets", format!("{h0};{h1}"));
    let model = ProfileBuilder::build(ProfileFamily::Footing, &map).unwrap();
    let base_z = 1500.0;
    let station2 = model.at(footing::FRONT_BOTTOM, 2).z - base_z;
    assert!((station2 - (0.5 * h0 + h1)).abs() < 1e-9);
    let station0 = model.at(footing::FRONT_BOTTOM, 0).z - base_z;
    assert!((station0 + 0.5 * h0).abs() < 1e-9);
}

#[test]
fn abutment_first_station_matches_chain() {
    let model = ProfileBuilder::build(ProfileFamily::Abutment, &abutment_map()).unwrap();
    let full_width = 300.0 + 400.0 + 600.0;
    assert_eq!(model.at(abutment::TOE_BOTTOM, 0), DVec3::new(0.0, -1000.0, full_width / 2.0));
    assert_eq!(model.at(abutment::HEEL_BOTTOM, 0), DVec3::new(0.0, -1000.0, -full_width / 2.0));
    assert_eq!(model.station(0).height(), 2000.0);
    assert_eq!(model.station(0).width(), full_width);
}

#[test]
fn skewed_abutment_splits_offset() {
    let map = abutment_map().with("HorizontalOffset", 400).with("VerticalOffset", -100);
    let model = ProfileBuilder::build(ProfileFamily::Abutment, &map).unwrap();
    assert_eq!(model.at(abutment::TOE_BOTTOM, 0).z, 650.0 - 200.0);
    assert_eq!(model.at(abutment::TOE_BOTTOM, 1).z, 650.0 + 200.0);
    assert_eq!(model.at(abutment::TOE_BOTTOM, 0).y, -1000.0 + 50.0);
    assert_eq!(model.at(abutment::TOE_BOTTOM, 1).y, -1000.0 - 50.0);
}

#[test]
fn governing_station_prefers_taller_end() {
    let map = wall_map().with("HeightEnd", 2000);
    let model = ProfileBuilder::build(ProfileFamily::RetainingWall, &map).unwrap();
    assert_eq!(model.governing_station(Extremum::Largest), 0);
    assert_eq!(model.governing_station(Extremum::Smallest), 1);
    assert_eq!(model.at(wall::STEM_FRONT_TOP, 1).y, 1000.0);
}

#[test]
fn unknown_family_and_missing_parameter() {
    assert!(matches!(
        ProfileBuilder::build_named("Pylon", &abutment_map()),
        Err(RcbarError::UnknownProfileFamily(_))
    ));

    let mut incomplete = ParameterMap::new();
    for (k, v) in abutment_map().iter() {
        if k != "BackwallWidth" {
            incomplete.insert(k, v);
        }
    }
    match ProfileBuilder::build(ProfileFamily::Abutment, &incomplete) {
        Err(RcbarError::InvalidParameter(msg)) => assert!(msg.contains("BackwallWidth")),
        other => panic!("expected InvalidParameter, got {other:?}"),
    }

    let malformed = abutment_map().with("Height", "two metres");
    assert!(matches!(
        ProfileBuilder::build(ProfileFamily::Abutment, &malformed),
        Err(RcbarError::InvalidParameter(_))
    ));
}
