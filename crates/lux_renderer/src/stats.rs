//! Diagnostic counters.
//!
//! Every render task owns a `RenderStats` and the totals are summed once
//! when the tasks finish. The counters never influence what gets drawn.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Ray and intersection-test counts for a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Scene traversals (camera, secondary and shadow rays)
    pub rays: u64,
    /// Individual sphere/triangle tests
    pub intersection_tests: u64,
}

impl Add for RenderStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            rays: self.rays + rhs.rays,
            intersection_tests: self.intersection_tests + rhs.intersection_tests,
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for RenderStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        let parts = [
            RenderStats {
                rays: 1,
                intersection_tests: 10,
            },
            RenderStats {
                rays: 2,
                intersection_tests: 20,
            },
            RenderStats {
                rays: 3,
                intersection_tests: 30,
            },
        ];
        let total: RenderStats = parts.into_iter().sum();

        assert_eq!(
            total,
            RenderStats {
                rays: 6,
                intersection_tests: 60,
            }
        );
    }

    #[test]
    fn test_counters_are_wide() {
        let mut stats = RenderStats {
            rays: u32::MAX as u64,
            intersection_tests: 0,
        };
        stats += RenderStats {
            rays: 1,
            intersection_tests: 0,
        };

        assert_eq!(stats.rays, 1 << 32);
    }
}
