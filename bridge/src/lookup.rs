/// Display names and estimates for host numeric codes. Pure data.
pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_VEHICLE: &str = "Unknown Vehicle";
pub const DEFAULT_VEHICLE_VALUE: u32 = 25_000;

pub fn vehicle_class_name(class: i32) -> &'static str {
    match class {
        0 => "Compacts",
        1 => "Sedans",
        2 => "SUVs",
        3 => "Coupes",
        4 => "Muscle",
        5 => "Sports Classics",
        6 => "Sports",
        7 => "Super",
        8 => "Motorcycles",
        9 => "Off-road",
        10 => "Industrial",
        11 => "Utility",
        12 => "Vans",
        13 => "Cycles",
        14 => "Boats",
        15 => "Helicopters",
        16 => "Planes",
        17 => "Service",
        18 => "Emergency",
        19 => "Military",
        20 => "Commercial",
        21 => "Trains",
        _ => UNKNOWN,
    }
}

/// Rough price estimate by class.
pub fn vehicle_value(class: i32) -> u32 {
    match class {
        0 => 15_000,
        1 => 25_000,
        2 => 35_000,
        3 => 45_000,
        4 => 50_000,
        5 => 100_000,
        6 => 150_000,
        7 => 500_000,
        8 => 20_000,
        9 => 30_000,
        10 => 25_000,
        11 => 20_000,
        12 => 18_000,
        13 => 500,
        14 => 75_000,
        15 => 250_000,
        16 => 500_000,
        17 => 15_000,
        18 => 35_000,
        19 => 150_000,
        20 => 40_000,
        21 => 100_000,
        _ => DEFAULT_VEHICLE_VALUE,
    }
}

pub fn weather_name(code: i32) -> &'static str {
    match code {
        0 => "Extra Sunny",
        1 => "Clear",
        2 => "Clouds",
        3 => "Smog",
        4 => "Foggy",
        5 => "Overcast",
        6 => "Raining",
        7 => "Thunderstorm",
        8 => "Light Rain",
        9 => "Smoggy",
        10 => "Snowing",
        11 => "Blizzard",
        12 => "Light Snow",
        13 => "Christmas",
        _ => UNKNOWN,
    }
}

/// Friendly name for a zone code; unmapped codes are returned as-is.
pub fn zone_name(code: &str) -> &str {
    match code {
        "AIRP" => "Los Santos Airport",
        "ALAMO" => "Alamo Sea",
        "ALTA" => "Alta",
        "ARMYB" => "Fort Zancudo",
        "BEACH" => "Vespucci Beach",
        "BHAMCA" => "Banham Canyon",
        "BRADP" => "Braddock Pass",
        "BRADT" => "Braddock Tunnel",
        "BURTON" => "Burton",
        "CALAFB" => "Calafia Bridge",
        "CANNY" => "Raton Canyon",
        "CCREAK" => "Cassidy Creek",
        "CHAMH" => "Chamberlain Hills",
        "CHIL" => "Vinewood Hills",
        "CHU" => "Chumash",
        "CMSW" => "Chiliad Mountain State Wilderness",
        "CYPRE" => "Cypress Flats",
        "DAVIS" => "Davis",
        "DELBE" => "Del Perro Beach",
        "DELPE" => "Del Perro",
        "DELSOL" => "La Puerta",
        "DESRT" => "Grand Senora Desert",
        "DOWNT" => "Downtown",
        "DTVINE" => "Downtown Vinewood",
        "EAST_V" => "East Vinewood",
        "EBURO" => "El Burro Heights",
        "ELGORL" => "El Gordo Lighthouse",
        "ELYSIAN" => "Elysian Island",
        "GALFISH" => "Galilee",
        "GOLF" => "GWC and Golfing Society",
        "GRAPES" => "Grapeseed",
        "GREATC" => "Great Chaparral",
        "HARMO" => "Harmony",
        "HAWICK" => "Hawick",
        "HORS" => "Vinewood Racetrack",
        "HUMLAB" => "Humane Labs and Research",
        "JAIL" => "Bolingbroke Penitentiary",
        "KOREAT" => "Little Seoul",
        "LACT" => "Land Act Reservoir",
        "LAGO" => "Lago Zancudo",
        "LDAM" => "Land Act Dam",
        "LEGSQU" => "Legion Square",
        "LMESA" => "La Mesa",
        "LOSPUER" => "La Puerta",
        "MIRR" => "Mirror Park",
        "MORN" => "Morningwood",
        "MOVIE" => "Richards Majestic",
        "MTCHIL" => "Mount Chiliad",
        "MTGORDO" => "Mount Gordo",
        "MTJOSE" => "Mount Josiah",
        "MURRI" => "Murrieta Heights",
        "NCHU" => "North Chumash",
        "NOOSE" => "N.O.O.S.E",
        "OCEANA" => "Pacific Ocean",
        "PALCOV" => "Paleto Cove",
        "PALETO" => "Paleto Bay",
        "PALFOR" => "Paleto Forest",
        "PALHIGH" => "Palomino Highlands",
        "PALMPOW" => "Palmer-Taylor Power Station",
        "PBLUFF" => "Pacific Bluffs",
        "PBOX" => "Pillbox Hill",
        "PROCOB" => "Procopio Beach",
        "RANCHO" => "Rancho",
        "RGLEN" => "Richman Glen",
        "RICHM" => "Richman",
        "ROCKF" => "Rockford Hills",
        "RTRAK" => "Redwood Lights Track",
        "SANAND" => "San Andreas",
        "SANCHIA" => "San Chianski Mountain Range",
        "SANDY" => "Sandy Shores",
        "SKID" => "Mission Row",
        "SLAB" => "Stab City",
        "STAD" => "Maze Bank Arena",
        "STRAW" => "Strawberry",
        "TATAMO" => "Tataviam Mountains",
        "TERMINA" => "Terminal",
        "TEXTI" => "Textile City",
        "TONGVAH" => "Tongva Hills",
        "TONGVAV" => "Tongva Valley",
        "VCANA" => "Vespucci Canals",
        "VESP" => "Vespucci",
        "VINE" => "Vinewood",
        "WINDF" => "Ron Alternates Wind Farm",
        "WVINE" => "West Vinewood",
        "ZANCUDO" => "Zancudo River",
        "ZP_ORT" => "Port of South Los Santos",
        "ZQ_UAR" => "Davis Quartz",
        other => other,
    }
}
