//! Stateful observer converting dense steps into flagged rows (spec §4.8).

use ballistics_core::constants::flags;
use crate::shot::ShotProps;
use crate::trajectory::BaseTrajSample;

/// Energy constant folding grain→pound and the `1/(2g)` factor into one
/// divisor: `E_ft_lb = weight_gr * v_fps^2 / ENERGY_CONSTANT`.
const ENERGY_CONSTANT: f64 = 450_240.0;

/// A [`BaseTrajSample`] enriched with derived quantities plus a flag bitmask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryRow {
    pub sample: BaseTrajSample,
    /// Height above/below the line of sight: `y*cos(look) - x*sin(look)`.
    pub drop_ft: f64,
    /// Lateral offset from the line of sight, including spin drift.
    pub windage_ft: f64,
    pub drop_angle_rad: f64,
    pub windage_angle_rad: f64,
    pub energy_ftlb: f64,
    pub spin_drift_ft: f64,
    pub slant_height_ft: f64,
    pub slant_distance_ft: f64,
    pub flags: u8,
}

impl TrajectoryRow {
    fn new(sample: BaseTrajSample, shot: &ShotProps, flag_bits: u8) -> Self {
        let look = shot.look_angle_rad;
        let spin_drift_ft = shot.spin_drift_ft(sample.time_s);
        let drop_ft = sample.position.y * look.cos() - sample.position.x * look.sin();
        let windage_ft = sample.position.z + spin_drift_ft;
        let range = sample.position.x.max(1e-9);
        Self {
            sample,
            drop_ft,
            windage_ft,
            drop_angle_rad: (drop_ft / range).atan(),
            windage_angle_rad: (windage_ft / range).atan(),
            energy_ftlb: shot.weight_gr * sample.velocity.dot(sample.velocity) / ENERGY_CONSTANT,
            spin_drift_ft,
            slant_height_ft: drop_ft,
            slant_distance_ft: sample.position.x * look.cos() + sample.position.y * look.sin(),
            flags: flag_bits,
        }
    }
}

/// Linear interpolation of a raw sample pair at a target downrange distance.
fn lerp_at_x(a: &BaseTrajSample, b: &BaseTrajSample, x: f64) -> BaseTrajSample {
    let dx = b.position.x - a.position.x;
    let u = if dx.abs() < 1e-12 { 0.0 } else { (x - a.position.x) / dx };
    BaseTrajSample {
        time_s: a.time_s + u * (b.time_s - a.time_s),
        position: ballistics_core::Vec3::new(x, a.position.y + u * (b.position.y - a.position.y), a.position.z + u * (b.position.z - a.position.z)),
        velocity: a.velocity + (b.velocity - a.velocity) * u,
        mach: a.mach + u * (b.mach - a.mach),
    }
}

/// Linear interpolation of a raw sample pair at a target `velocity.y` (apex).
fn lerp_at_vy(a: &BaseTrajSample, b: &BaseTrajSample, vy: f64) -> BaseTrajSample {
    let dvy = b.velocity.y - a.velocity.y;
    let u = if dvy.abs() < 1e-12 { 0.0 } else { (vy - a.velocity.y) / dvy };
    BaseTrajSample {
        time_s: a.time_s + u * (b.time_s - a.time_s),
        position: a.position + (b.position - a.position) * u,
        velocity: ballistics_core::Vec3::new(a.velocity.x + u * (b.velocity.x - a.velocity.x), vy, a.velocity.z + u * (b.velocity.z - a.velocity.z)),
        mach: a.mach + u * (b.mach - a.mach),
    }
}

/// Converts a dense stream of raw samples into flagged [`TrajectoryRow`]s.
///
/// Restartable only by reconstruction: there is no `reset` method.
pub struct DataFilter {
    selected: u8,
    range_step_ft: f64,
    time_step_s: f64,
    previous: Option<BaseTrajSample>,
    prev_mach_ratio: Option<f64>,
    last_time_record_s: f64,
    next_record_distance_ft: f64,
    range_exhausted: bool,
    mach_seen: bool,
    zero_up_seen: bool,
    zero_down_seen: bool,
    apex_seen: bool,
    look_angle_tan: f64,
}

impl DataFilter {
    pub fn new(selected: u8, range_step_ft: f64, time_step_s: f64, look_angle_rad: f64) -> Self {
        Self {
            selected,
            range_step_ft,
            time_step_s,
            previous: None,
            prev_mach_ratio: None,
            last_time_record_s: 0.0,
            next_record_distance_ft: 0.0,
            range_exhausted: false,
            mach_seen: false,
            zero_up_seen: false,
            zero_down_seen: false,
            apex_seen: false,
            look_angle_tan: look_angle_rad.tan(),
        }
    }

    fn wants(&self, bit: u8) -> bool {
        self.selected & bit != 0
    }

    /// Feed the next raw sample, returning every row this step produces
    /// (zero or more — emission is additive, not mutually exclusive).
    pub fn push(&mut self, cur: BaseTrajSample, shot: &ShotProps) -> Vec<TrajectoryRow> {
        let mut out = Vec::new();

        if let Some(prev) = self.previous {
            if self.wants(flags::RANGE) && !self.range_exhausted {
                loop {
                    if self.range_step_ft <= 0.0 {
                        self.range_exhausted = true;
                        break;
                    }
                    if self.next_record_distance_ft > cur.position.x {
                        break;
                    }
                    let interp = lerp_at_x(&prev, &cur, self.next_record_distance_ft);
                    out.push(TrajectoryRow::new(interp, shot, flags::RANGE));
                    self.next_record_distance_ft += self.range_step_ft;
                }
            }

            if self.wants(flags::MACH) && !self.mach_seen {
                if let Some(prev_ratio) = self.prev_mach_ratio {
                    let cur_ratio = cur.velocity.magnitude() / cur.mach;
                    if prev_ratio > 1.0 && cur_ratio <= 1.0 {
                        self.mach_seen = true;
                        out.push(TrajectoryRow::new(cur, shot, flags::MACH));
                    }
                }
            }

            if self.wants(flags::ZERO_UP) && !self.zero_up_seen {
                if cur.position.y >= cur.position.x * self.look_angle_tan {
                    self.zero_up_seen = true;
                    out.push(TrajectoryRow::new(cur, shot, flags::ZERO_UP));
                }
            }

            if self.wants(flags::ZERO_DOWN) && self.zero_up_seen && !self.zero_down_seen {
                if cur.position.y < cur.position.x * self.look_angle_tan {
                    self.zero_down_seen = true;
                    out.push(TrajectoryRow::new(cur, shot, flags::ZERO_DOWN));
                }
            }

            if self.wants(flags::APEX) && !self.apex_seen && prev.velocity.y > 0.0 && cur.velocity.y <= 0.0 {
                self.apex_seen = true;
                let apex = lerp_at_vy(&prev, &cur, 0.0);
                out.push(TrajectoryRow::new(apex, shot, flags::APEX));
            }
        } else if self.wants(flags::RANGE) && self.next_record_distance_ft <= cur.position.x {
            out.push(TrajectoryRow::new(cur, shot, flags::RANGE));
            if self.range_step_ft <= 0.0 {
                self.range_exhausted = true;
            } else {
                self.next_record_distance_ft += self.range_step_ft;
            }
        }

        if self.time_step_s > 0.0 && cur.time_s - self.last_time_record_s > self.time_step_s {
            self.last_time_record_s = cur.time_s;
            out.push(TrajectoryRow::new(cur, shot, flags::NONE));
        }

        self.prev_mach_ratio = Some(cur.velocity.magnitude() / cur.mach);
        self.previous = Some(cur);
        out
    }

    /// Emit a closing row for the final raw sample, guaranteeing the
    /// trajectory's end is always represented even when `range_step` is too
    /// coarse (or zero) to have produced one naturally.
    pub fn finish(&mut self, last: BaseTrajSample, shot: &ShotProps) -> Option<TrajectoryRow> {
        if self.wants(flags::RANGE) {
            Some(TrajectoryRow::new(last, shot, flags::RANGE))
        } else {
            None
        }
    }
}
