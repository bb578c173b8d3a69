// Per-track segment boundary tables consumed read-only by the locator

mod locator;

pub use locator::{SectorLookup, sector_of, turn_label};

/// One labelled position range on a track. Bounds are inclusive
/// fractions of a lap in [0, 1]. A track's ranges are ordered and the
/// first match wins for label lookup; the `end` values double as the
/// cumulative sector boundaries and must be non-decreasing for sector
/// derivation to be well-defined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentRange {
    pub start: f64,
    pub end: f64,
    pub label: &'static str,
}

impl SegmentRange {
    pub fn contains(&self, pos: f64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

/// Immutable mapping from a track identifier to its ordered segment
/// list. Injected into the engine and locator so tests can run against
/// synthetic tracks instead of the shipped tables.
pub trait SegmentSource {
    /// Ordered segment ranges for the track, or `None` if unknown.
    /// Track identifiers compare case-insensitively.
    fn segments(&self, track_id: &str) -> Option<&[SegmentRange]>;
}

/// The corner tables shipped with the crate.
pub struct BuiltinTrackData;

impl BuiltinTrackData {
    /// All known (track id, segment table) pairs, for enumeration.
    pub fn tracks() -> impl Iterator<Item = (&'static str, &'static [SegmentRange])> {
        TRACKS.iter().copied()
    }

    pub fn track_ids() -> impl Iterator<Item = &'static str> {
        TRACKS.iter().map(|(id, _)| *id)
    }
}

impl SegmentSource for BuiltinTrackData {
    fn segments(&self, track_id: &str) -> Option<&[SegmentRange]> {
        TRACKS
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(track_id))
            .map(|(_, ranges)| *ranges)
    }
}

const fn seg(start: f64, end: f64, label: &'static str) -> SegmentRange {
    SegmentRange { start, end, label }
}

static TRACKS: &[(&str, &[SegmentRange])] = &[
    ("nurburgring_24h", NURBURGRING_24H),
    ("nurburgring", NURBURGRING),
    ("misano", MISANO),
    ("kyalami", KYALAMI),
    ("hungaroring", HUNGARORING),
    ("donington", DONINGTON),
    ("imola", IMOLA),
    ("laguna_seca", LAGUNA_SECA),
    ("monza", MONZA),
    ("oulton_park", OULTON_PARK),
    ("paul_ricard", PAUL_RICARD),
    ("silverstone", SILVERSTONE),
    ("snetterton", SNETTERTON),
    ("spa", SPA),
    ("suzuka", SUZUKA),
    ("brands_hatch", BRANDS_HATCH),
    ("mount_panorama", MOUNT_PANORAMA),
    ("barcelona", BARCELONA),
    ("zandvoort", ZANDVOORT),
    ("zolder", ZOLDER),
    ("watkins_glen", WATKINS_GLEN),
    ("cota", COTA),
];

static NURBURGRING_24H: &[SegmentRange] = &[
    seg(0.016, 0.031, "Yokohama-S"),
    seg(0.039, 0.048, "Valvoline-Kurve"),
    seg(0.048, 0.0550, "Ford-Kurve"),
    seg(0.067, 0.079, "Dunlop-Kehre"),
    seg(0.085, 0.100, "Michael-Schumacher-S"),
    seg(0.107, 0.116, "Michelin-Kurve"),
    seg(0.116, 0.125, "Warsteiner/Bilstein-Kurve"),
    seg(0.133, 0.144, "ADVAN-Bogen"),
    seg(0.151, 0.163, "NGK-Schikane"),
    seg(0.163, 0.172, "T13"),
    seg(0.172, 0.179, "Sabine-Schmitz-Kurve"),
    seg(0.181, 0.186, "Hatzenbach Bogen"),
    seg(0.186, 0.221, "Hatzenbach"),
    seg(0.221, 0.232, "Hoheichen"),
    seg(0.232, 0.266, "Quiddelbacher Höhe"),
    seg(0.266, 0.281, "Flugplatz"),
    seg(0.281, 0.295, "Kottenborn"),
    seg(0.300, 0.315, "Schwedenkreuz Kurve"),
    seg(0.315, 0.325, "Aremberg"),
    seg(0.327, 0.364, "Fuchsröhre"),
    seg(0.364, 0.379, "Adenauer Forst"),
    seg(0.388, 0.398, "Rebel Tree"),
    seg(0.398, 0.408, "Metzgesfeld I"),
    seg(0.408, 0.414, "Metzgesfeld II"),
    seg(0.419, 0.427, "Kallenhard"),
    seg(0.431, 0.441, "Spiegelkurve/Piff-Paff"),
    seg(0.441, 0.453, "Miss-hit-miss"),
    seg(0.455, 0.466, "Wehrseifen"),
    seg(0.471, 0.478, "Breidscheid"),
    seg(0.478, 0.486, "Breidscheid Bridge"),
    seg(0.486, 0.492, "Ex-Mühle"),
    seg(0.500, 0.514, "Lauda Links"),
    seg(0.514, 0.525, "Bergwerk"),
    seg(0.529, 0.562, "Kesselchen"),
    seg(0.570, 0.588, "Klostertal"),
    seg(0.588, 0.603, "Mutkurve/Courage Corner"),
    seg(0.617, 0.632, "Steilstrecke"),
    seg(0.637, 0.647, "Carraciola-Karussell Kurve"),
    seg(0.678, 0.686, "Hohe Acht"),
    seg(0.686, 0.697, "Hedgwigshöhe"),
    seg(0.697, 0.707, "Wippermann"),
    seg(0.707, 0.726, "Eschbach"),
    seg(0.726, 0.742, "Brünnchen/YouTube Corner"),
    seg(0.744, 0.753, "Eiskurve"),
    seg(0.758, 0.777, "Pflanzgarten I"),
    seg(0.777, 0.794, "Pflanzgarten II"),
    seg(0.794, 0.813, "Stefan-Bellof-S"),
    seg(0.813, 0.832, "Schwalbenschwanz"),
    seg(0.832, 0.8405, "Kleine Karussell"),
    seg(0.848, 0.868, "Galgenkopf"),
    seg(0.868, 0.936, "Döttinger Höhe"),
    seg(0.936, 0.957, "Antoniusbuche"),
    seg(0.959, 0.973, "Tiergarten"),
    seg(0.973, 0.983, "Hohenrain-Schikane"),
    seg(0.983, 0.991, "T13"),
];

static NURBURGRING: &[SegmentRange] = &[
    seg(0.090, 0.135, "Haug-Haken"),
    seg(0.100, 0.242, "Mercedes Arena"),
    seg(0.290, 0.335, "Valvoline-Kurve"),
    seg(0.335, 0.370, "Ford-Kurve"),
    seg(0.440, 0.498, "Dunlop-Kehre"),
    seg(0.525, 0.602, "Michael-Schumacher-S"),
    seg(0.630, 0.670, "Michelin-Kurve"),
    seg(0.680, 0.725, "Warsteiner-Kurve"),
    seg(0.775, 0.810, "ADVAN-Bogen"),
    seg(0.850, 0.908, "NGK-Schikane"),
    seg(0.925, 0.965, "Coca-Cola Kurve"),
];

static MISANO: &[SegmentRange] = &[
    seg(0.040, 0.140, "Variante del Parco"),
    seg(0.170, 0.250, "Curva del Rio"),
    seg(0.360, 0.420, "Curva Quercia"),
    seg(0.470, 0.532, "Curva Tramonto"),
    seg(0.645, 0.785, "Curvone"),
    seg(0.785, 0.828, "Curva Del Carro"),
    seg(0.900, 0.945, "Curva Misano"),
];

static KYALAMI: &[SegmentRange] = &[
    seg(0.034, 0.070, "The Kink"),
    seg(0.110, 0.165, "Crowthorne"),
    seg(0.170, 0.210, "Jukskei Sweep"),
    seg(0.210, 0.245, "Barbeque"),
    seg(0.325, 0.395, "Sunset"),
    seg(0.412, 0.452, "Clubhouse Bend"),
    seg(0.480, 0.570, "The Esses"),
    seg(0.610, 0.665, "Leeukop"),
    seg(0.680, 0.780, "Mineshaft"),
    seg(0.800, 0.840, "The Crocodiles"),
    seg(0.865, 0.900, "Cheeta"),
    seg(0.915, 0.960, "Ingwe"),
];

static HUNGARORING: &[SegmentRange] = &[
    seg(0.115, 0.165, "T1"),
    seg(0.175, 0.200, "T1a"),
    seg(0.220, 0.285, "T2"),
    seg(0.290, 0.325, "T3"),
    seg(0.390, 0.435, "T4 - Mansell"),
    seg(0.445, 0.512, "T5"),
    seg(0.530, 0.552, "T6"),
    seg(0.552, 0.570, "T7"),
    seg(0.580, 0.605, "T8"),
    seg(0.612, 0.645, "T9"),
    seg(0.655, 0.688, "T10"),
    seg(0.700, 0.738, "T11 - Alesi"),
    seg(0.785, 0.830, "T12"),
    seg(0.830, 0.850, "T12a"),
    seg(0.850, 0.895, "T13"),
    seg(0.905, 0.965, "T14"),
];

static DONINGTON: &[SegmentRange] = &[
    seg(0.085, 0.135, "Redgate"),
    seg(0.165, 0.200, "Hollywood"),
    seg(0.220, 0.250, "Craner Curves"),
    seg(0.280, 0.310, "Old Hairpin"),
    seg(0.325, 0.355, "Starkey's Bridge"),
    seg(0.400, 0.425, "Schwantz Curve"),
    seg(0.435, 0.480, "McLeans"),
    seg(0.510, 0.585, "Coppice"),
    seg(0.620, 0.690, "Starkey's Straight"),
    seg(0.700, 0.750, "Fogarty Esses"),
    seg(0.810, 0.870, "Melbourne Hairpin"),
    seg(0.920, 0.965, "Goddarts"),
    seg(0.975, 0.999, "WheatCroft Straight"),
];

static IMOLA: &[SegmentRange] = &[
    seg(0.115, 0.195, "Tamburello"),
    seg(0.252, 0.302, "Villeneuve"),
    seg(0.325, 0.370, "Tosa"),
    seg(0.448, 0.508, "Piratella"),
    seg(0.540, 0.598, "Acque Minerali"),
    seg(0.655, 0.705, "Variante Alta"),
    seg(0.818, 0.887, "Rivazza"),
];

static LAGUNA_SECA: &[SegmentRange] = &[
    seg(0.100, 0.160, "T2 - Andretti Hairpin"),
    seg(0.185, 0.243, "T3"),
    seg(0.258, 0.312, "T4"),
    seg(0.390, 0.470, "T5"),
    seg(0.520, 0.555, "T6"),
    seg(0.570, 0.650, "Rahal Straight"),
    seg(0.650, 0.718, "The Corkscrew"),
    seg(0.740, 0.785, "T9"),
    seg(0.805, 0.862, "T10"),
    seg(0.880, 0.930, "T11"),
];

static MONZA: &[SegmentRange] = &[
    seg(0.135, 0.175, "Prima Variante"),
    seg(0.225, 0.300, "Curva Biassono"),
    seg(0.340, 0.382, "Seconda Variante"),
    seg(0.415, 0.450, "1° Curva di Lesmo"),
    seg(0.475, 0.510, "2° Curva di Lesmo"),
    seg(0.540, 0.620, "Curva del Serraglio"),
    seg(0.660, 0.725, "Variante Ascari"),
    seg(0.870, 0.955, "Curva Parabolica"),
];

static OULTON_PARK: &[SegmentRange] = &[
    seg(0.040, 0.075, "Old Hall Corner"),
    seg(0.130, 0.150, "The Avenue"),
    seg(0.160, 0.200, "Cascades"),
    seg(0.210, 0.250, "Lakeside"),
    seg(0.300, 0.350, "Island Bend"),
    seg(0.365, 0.405, "Shell Oils Corner"),
    seg(0.460, 0.500, "Britten's"),
    seg(0.520, 0.550, "Hilltop"),
    seg(0.595, 0.625, "Hislop's"),
    seg(0.630, 0.660, "Knickerbrook"),
    seg(0.680, 0.720, "Clay Hill"),
    seg(0.730, 0.765, "Watter Tower"),
    seg(0.780, 0.825, "Druids Corner"),
    seg(0.900, 0.940, "Lodge Corner"),
    seg(0.955, 0.985, "Deer Leap"),
];

static PAUL_RICARD: &[SegmentRange] = &[
    seg(0.085, 0.145, "\"S\" de la Verrerie"),
    seg(0.217, 0.235, "Virage de L'Hôtel"),
    seg(0.252, 0.270, "Virage du Camp"),
    seg(0.252, 0.312, "Virage de la Sainte-Beaume"),
    seg(0.380, 0.620, "Ligne Droit du Mistral"),
    seg(0.640, 0.690, "Courbe de Signes"),
    seg(0.712, 0.780, "Double Droite du Beausset"),
    seg(0.800, 0.840, "Virage de Bendor"),
    seg(0.840, 0.890, "Courbe du Garlaban"),
    seg(0.890, 0.930, "Virage de la Tour"),
    seg(0.930, 0.955, "Virage du Pont"),
];

static SILVERSTONE: &[SegmentRange] = &[
    seg(0.0245, 0.0455, "Copse"),
    seg(0.115, 0.210, "Maggots & Becketts"),
    seg(0.210, 0.238, "Chapel Curve"),
    seg(0.250, 0.340, "Hangar Straight"),
    seg(0.350, 0.385, "Stowe"),
    seg(0.400, 0.440, "Vale"),
    seg(0.445, 0.500, "Club"),
    seg(0.515, 0.560, "Hamilton Straight"),
    seg(0.570, 0.595, "Abbey"),
    seg(0.610, 0.635, "Farm Curve"),
    seg(0.650, 0.680, "Village"),
    seg(0.680, 0.705, "The Loop"),
    seg(0.717, 0.738, "Aintree"),
    seg(0.760, 0.810, "Wellington Straight"),
    seg(0.825, 0.865, "Brooklands"),
    seg(0.870, 0.910, "Luffield"),
    seg(0.930, 0.960, "Woodcote"),
];

static SNETTERTON: &[SegmentRange] = &[
    seg(0.062, 0.110, "Riches"),
    seg(0.145, 0.182, "Montreal (Scary Tree)"),
    seg(0.215, 0.265, "Palmer"),
    seg(0.335, 0.370, "Agostini"),
    seg(0.405, 0.425, "Hamilton"),
    seg(0.450, 0.490, "Oggies"),
    seg(0.500, 0.540, "Williams"),
    seg(0.560, 0.650, "Bentley Straight"),
    seg(0.690, 0.740, "Nelson"),
    seg(0.750, 0.785, "Bomb Hole"),
    seg(0.820, 0.890, "Coram"),
    seg(0.890, 0.905, "Murrays"),
];

static SPA: &[SegmentRange] = &[
    seg(0.035, 0.058, "La Source"),
    seg(0.130, 0.152, "Eau Rouge"),
    seg(0.152, 0.185, "Raidillon"),
    seg(0.205, 0.233, "Kemmel"),
    seg(0.233, 0.300, "Kemmel Straight"),
    seg(0.318, 0.360, "Les Combes"),
    seg(0.365, 0.385, "Malmedy"),
    seg(0.410, 0.450, "Bruxelles"),
    seg(0.525, 0.595, "Double Gauche"),
    seg(0.620, 0.672, "Les Fagnes"),
    seg(0.690, 0.715, "Campus"),
    seg(0.715, 0.745, "Stavelot"),
    seg(0.770, 0.810, "Courbe Paul Frere"),
    seg(0.865, 0.900, "Blanchimont"),
    seg(0.935, 0.975, "Chicane"),
];

static SUZUKA: &[SegmentRange] = &[
    seg(0.050, 0.114, "First Corner"),
    seg(0.128, 0.200, "Snake"),
    seg(0.200, 0.235, "Anti-Banked Curve"),
    seg(0.235, 0.310, "Dunlop"),
    seg(0.330, 0.358, "Degner 1"),
    seg(0.358, 0.382, "Degner 2"),
    seg(0.432, 0.463, "Hairpin"),
    seg(0.490, 0.570, "200R"),
    seg(0.588, 0.665, "Spoon Curve"),
    seg(0.710, 0.770, "Backstretch"),
    seg(0.785, 0.832, "130R"),
    seg(0.860, 0.895, "Cassio Triangle"),
    seg(0.895, 0.930, "Last Curve"),
];

static BRANDS_HATCH: &[SegmentRange] = &[
    seg(0.010, 0.095, "Paddock Hill Bend"),
    seg(0.095, 0.135, "Pilgrim's Rise"),
    seg(0.135, 0.170, "Druids"),
    seg(0.190, 0.235, "Graham Hill Bend"),
    seg(0.235, 0.270, "Cooper Straight"),
    seg(0.280, 0.350, "Surtees"),
    seg(0.418, 0.480, "Pilgrim's Drop"),
    seg(0.480, 0.550, "Hawthorn Bend"),
    seg(0.550, 0.580, "Derek Minter Straight"),
    seg(0.580, 0.630, "Westfield Bend"),
    seg(0.650, 0.675, "Dingle Dell"),
    seg(0.650, 0.720, "Sheene's"),
    seg(0.735, 0.787, "Stirling's"),
    seg(0.787, 0.855, "Clearways"),
    seg(0.855, 0.940, "Clark Curve"),
    seg(0.955, 0.999, "Brabham Straight"),
];

static MOUNT_PANORAMA: &[SegmentRange] = &[
    seg(0.001, 0.030, "Pit Straight"),
    seg(0.042, 0.070, "Hell Corner"),
    seg(0.100, 0.210, "Mountain Straight"),
    seg(0.220, 0.265, "Quarry Bend"),
    seg(0.300, 0.332, "The Cutting"),
    seg(0.332, 0.348, "Griffin's Mouth"),
    seg(0.348, 0.375, "Reid Park"),
    seg(0.380, 0.470, "Sullman Park"),
    seg(0.475, 0.500, "McPhillamy Park"),
    seg(0.500, 0.525, "Skyline"),
    seg(0.525, 0.555, "The Esses"),
    seg(0.560, 0.590, "The Dipper"),
    seg(0.610, 0.640, "Forest's Elbow"),
    seg(0.700, 0.820, "Conrod Straight"),
    seg(0.850, 0.918, "The Chase"),
    seg(0.960, 0.989, "Murray's Corner"),
];

static BARCELONA: &[SegmentRange] = &[
    seg(0.155, 0.220, "Elf"),
    seg(0.230, 0.320, "Renault"),
    seg(0.355, 0.420, "Repsol"),
    seg(0.440, 0.478, "Seat"),
    seg(0.535, 0.583, "Würth"),
    seg(0.600, 0.655, "Campsa"),
    seg(0.725, 0.770, "La Caixa"),
    seg(0.795, 0.840, "Banc Sabadell"),
    seg(0.850, 0.875, "Europcar"),
    seg(0.885, 0.908, "Chicane RACC"),
    seg(0.915, 0.960, "New Holland"),
];

static ZANDVOORT: &[SegmentRange] = &[
    seg(0.060, 0.108, "Tarzanbocht"),
    seg(0.140, 0.175, "Gerlachbocht"),
    seg(0.180, 0.220, "Hugenholtzbocht"),
    seg(0.240, 0.280, "Hunzerug"),
    seg(0.280, 0.370, "Rob Slotemakerbocht"),
    seg(0.380, 0.440, "Sheivlak"),
    seg(0.470, 0.510, "Mastersbocht"),
    seg(0.525, 0.565, "Bocht 9"),
    seg(0.580, 0.620, "Bocht 10"),
    seg(0.710, 0.755, "Hans Ernst Bocht"),
    seg(0.805, 0.845, "Kumho"),
    seg(0.855, 0.920, "Arie Luyendijk Bocht"),
];

static ZOLDER: &[SegmentRange] = &[
    seg(0.040, 0.100, "Earste"),
    seg(0.138, 0.190, "Sterrenwachtbocht"),
    seg(0.190, 0.239, "Kanaalbocht"),
    seg(0.260, 0.312, "Lucien Bianchibocht"),
    seg(0.420, 0.455, "Kleine Chicane"),
    seg(0.460, 0.500, "Sacramentshelling"),
    seg(0.505, 0.545, "Butte"),
    seg(0.555, 0.596, "Villeneuve Chicane"),
    seg(0.627, 0.670, "Terlamenbocht"),
    seg(0.730, 0.775, "Bolderbergbocht"),
    seg(0.775, 0.805, "Jochen Rindtbocht"),
    seg(0.880, 0.942, "Jacky Ickxbocht"),
];

static WATKINS_GLEN: &[SegmentRange] = &[
    seg(0.050, 0.080, "The 90"),
    seg(0.111, 0.260, "Esses"),
    seg(0.270, 0.310, "Back Straight"),
    seg(0.330, 0.395, "Inner Loop"),
    seg(0.400, 0.460, "Outer Loop"),
    seg(0.480, 0.542, "Chute"),
    seg(0.575, 0.640, "Toe"),
    seg(0.640, 0.700, "\"The Boot\""),
    seg(0.710, 0.750, "Heel"),
];

static COTA: &[SegmentRange] = &[
    seg(0.100, 0.132, "T1"),
    seg(0.150, 0.184, "T2"),
    seg(0.200, 0.220, "T3"),
    seg(0.220, 0.236, "T4"),
    seg(0.236, 0.255, "T5"),
    seg(0.255, 0.298, "T6"),
    seg(0.305, 0.325, "T7"),
    seg(0.328, 0.352, "T8"),
    seg(0.352, 0.370, "T9"),
    seg(0.385, 0.405, "T10"),
    seg(0.445, 0.478, "T11"),
    seg(0.673, 0.700, "T12"),
    seg(0.718, 0.739, "T13"),
    seg(0.739, 0.760, "T14"),
    seg(0.760, 0.790, "T15"),
    seg(0.810, 0.825, "T16"),
    seg(0.825, 0.840, "T17"),
    seg(0.840, 0.890, "T18"),
    seg(0.900, 0.925, "T19"),
    seg(0.950, 0.980, "T20"),
];
