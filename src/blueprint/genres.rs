//! Blueprint tables, one per genre, on the 16-step reference grid.

use super::{Blueprint, CoreRule, Effect, Genre, Variation};
use crate::voice::Role;

const QUARTERS: &[usize] = &[0, 4, 8, 12];
const BACKBEAT: &[usize] = &[4, 12];
const OFFBEATS: &[usize] = &[2, 6, 10, 14];
const EIGHTHS: &[usize] = &[0, 2, 4, 6, 8, 10, 12, 14];
const ODD_SIXTEENTHS: &[usize] = &[1, 3, 5, 7, 9, 11, 13, 15];
const SIXTEENTHS: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

const fn var(probability: f64, effect: Effect) -> Variation {
    Variation {
        probability,
        every: 1,
        effect,
    }
}

const fn var_every(probability: f64, every: usize, effect: Effect) -> Variation {
    Variation {
        probability,
        every,
        effect,
    }
}

static HOUSE: Blueprint = Blueprint {
    genre: Genre::House,
    core: &[
        CoreRule { role: Role::Kick, steps: QUARTERS },
        CoreRule { role: Role::Snare, steps: BACKBEAT },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: OFFBEATS }),
        var(0.7, Effect::Add { role: Role::OpenHat, steps: OFFBEATS }),
        var(0.5, Effect::Add { role: Role::Clap, steps: BACKBEAT }),
        var(0.4, Effect::Add { role: Role::ClosedHat, steps: ODD_SIXTEENTHS }),
        var(0.3, Effect::Add { role: Role::Shaker, steps: ODD_SIXTEENTHS }),
        var(0.35, Effect::Add { role: Role::Rim, steps: &[7, 15] }),
        var(0.3, Effect::Euclid { role: Role::Cowbell, pulses: 3, rotations: &[0, 2, 4] }),
        var_every(0.4, 2, Effect::Add { role: Role::Kick, steps: &[14] }),
    ],
    swing: 0.0,
};

static TECHNO: Blueprint = Blueprint {
    genre: Genre::Techno,
    core: &[CoreRule { role: Role::Kick, steps: QUARTERS }],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: OFFBEATS }),
        var(0.6, Effect::Add { role: Role::Clap, steps: BACKBEAT }),
        var(0.5, Effect::Euclid { role: Role::ClosedHat, pulses: 7, rotations: &[0, 1, 3] }),
        var(0.4, Effect::Add { role: Role::OpenHat, steps: &[2, 10] }),
        var(0.3, Effect::Euclid { role: Role::Rim, pulses: 5, rotations: &[0, 2] }),
        var(0.25, Effect::Add { role: Role::Ride, steps: EIGHTHS }),
        var(0.2, Effect::Remove { role: Role::ClosedHat, steps: &[14] }),
        var_every(0.3, 4, Effect::Add { role: Role::Snare, steps: &[13, 15] }),
    ],
    swing: 0.0,
};

static HIPHOP: Blueprint = Blueprint {
    genre: Genre::HipHop,
    core: &[
        CoreRule { role: Role::Kick, steps: &[0, 10] },
        CoreRule { role: Role::Snare, steps: BACKBEAT },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: EIGHTHS }),
        var(0.6, Effect::Add { role: Role::Kick, steps: &[7] }),
        var(0.4, Effect::Add { role: Role::Kick, steps: &[13] }),
        var(0.5, Effect::Add { role: Role::Snare, steps: &[15] }),
        var(0.3, Effect::Add { role: Role::OpenHat, steps: &[14] }),
        var(0.3, Effect::Remove { role: Role::ClosedHat, steps: &[14] }),
        var(0.25, Effect::Add { role: Role::Rim, steps: &[3, 11] }),
    ],
    swing: 0.18,
};

static FUNK: Blueprint = Blueprint {
    genre: Genre::Funk,
    core: &[
        CoreRule { role: Role::Kick, steps: &[0] },
        CoreRule { role: Role::Snare, steps: BACKBEAT },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: SIXTEENTHS }),
        var(0.7, Effect::Add { role: Role::Kick, steps: &[3, 10] }),
        var(0.5, Effect::Add { role: Role::Kick, steps: &[6, 14] }),
        var(0.6, Effect::Add { role: Role::Snare, steps: &[7, 9] }),
        var(0.35, Effect::Remove { role: Role::ClosedHat, steps: &[6, 14] }),
        var(0.35, Effect::Add { role: Role::OpenHat, steps: &[6, 14] }),
        var(0.4, Effect::Euclid { role: Role::Cowbell, pulses: 5, rotations: &[0, 3] }),
    ],
    swing: 0.08,
};

static ROCK: Blueprint = Blueprint {
    genre: Genre::Rock,
    core: &[
        CoreRule { role: Role::Kick, steps: &[0, 8] },
        CoreRule { role: Role::Snare, steps: BACKBEAT },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: EIGHTHS }),
        var(0.5, Effect::Add { role: Role::Kick, steps: &[10] }),
        var(0.35, Effect::Add { role: Role::Kick, steps: &[6] }),
        var(0.25, Effect::Replace { role: Role::ClosedHat, steps: QUARTERS }),
        var(0.25, Effect::Add { role: Role::Ride, steps: EIGHTHS }),
        var_every(0.5, 4, Effect::Add { role: Role::Crash, steps: &[0] }),
    ],
    swing: 0.0,
};

static BREAKBEAT: Blueprint = Blueprint {
    genre: Genre::Breakbeat,
    core: &[
        CoreRule { role: Role::Kick, steps: &[0, 10] },
        CoreRule { role: Role::Snare, steps: BACKBEAT },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::Ride, steps: EIGHTHS }),
        var(0.6, Effect::Add { role: Role::Kick, steps: &[2] }),
        var(0.5, Effect::Add { role: Role::Snare, steps: &[7, 9] }),
        var(0.4, Effect::Add { role: Role::Snare, steps: &[15] }),
        var(0.4, Effect::Add { role: Role::ClosedHat, steps: OFFBEATS }),
        var(0.35, Effect::Euclid { role: Role::Shaker, pulses: 9, rotations: &[0, 1] }),
    ],
    swing: 0.05,
};

static TRAP: Blueprint = Blueprint {
    genre: Genre::Trap,
    core: &[
        CoreRule { role: Role::Kick, steps: &[0] },
        CoreRule { role: Role::Snare, steps: &[8] },
    ],
    variations: &[
        var(1.0, Effect::Add { role: Role::ClosedHat, steps: EIGHTHS }),
        var(0.6, Effect::Euclid { role: Role::ClosedHat, pulses: 12, rotations: &[0, 2] }),
        var(0.5, Effect::Add { role: Role::Kick, steps: &[6, 11] }),
        var(0.4, Effect::Add { role: Role::Kick, steps: &[14] }),
        var(0.4, Effect::Add { role: Role::OpenHat, steps: &[12] }),
        var(0.3, Effect::Add { role: Role::Clap, steps: &[8] }),
        var(0.3, Effect::Remove { role: Role::ClosedHat, steps: &[12] }),
    ],
    swing: 0.0,
};

static EUCLIDEAN: Blueprint = Blueprint {
    genre: Genre::Euclidean,
    core: &[CoreRule { role: Role::Kick, steps: &[0] }],
    variations: &[
        var(1.0, Effect::Euclid { role: Role::Kick, pulses: 3, rotations: &[0] }),
        var(1.0, Effect::Euclid { role: Role::Snare, pulses: 2, rotations: &[4, 6] }),
        var(1.0, Effect::Euclid { role: Role::ClosedHat, pulses: 7, rotations: &[0, 1, 2, 3] }),
        var(0.7, Effect::Euclid { role: Role::Rim, pulses: 5, rotations: &[1, 3, 5] }),
        var(0.6, Effect::Euclid { role: Role::Shaker, pulses: 9, rotations: &[0, 2] }),
        var(0.5, Effect::Euclid { role: Role::Cowbell, pulses: 3, rotations: &[2, 6, 10] }),
        var(0.5, Effect::Euclid { role: Role::OpenHat, pulses: 2, rotations: &[2, 6] }),
        var(0.4, Effect::Euclid { role: Role::LowTom, pulses: 3, rotations: &[5, 9] }),
    ],
    swing: 0.0,
};

pub fn blueprint(genre: Genre) -> &'static Blueprint {
    match genre {
        Genre::House => &HOUSE,
        Genre::Techno => &TECHNO,
        Genre::HipHop => &HIPHOP,
        Genre::Funk => &FUNK,
        Genre::Rock => &ROCK,
        Genre::Breakbeat => &BREAKBEAT,
        Genre::Trap => &TRAP,
        Genre::Euclidean => &EUCLIDEAN,
    }
}
