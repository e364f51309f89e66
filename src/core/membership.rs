use std::sync::OnceLock;

use crate::models::Freelancer;

/// Default bit-array length
pub const DEFAULT_FILTER_BITS: usize = 1024;

/// Default number of hash functions
pub const DEFAULT_FILTER_HASHES: u32 = 3;

/// Sizing of a [`MembershipFilter`]
///
/// There is no capacity enforcement: the false-positive rate grows with the
/// number of distinct items, so `bits` and `hashes` should be chosen for the
/// expected skill vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub bits: usize,
    pub hashes: u32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            bits: DEFAULT_FILTER_BITS,
            hashes: DEFAULT_FILTER_HASHES,
        }
    }
}

/// Fixed-size probabilistic set of skill strings (Bloom filter)
///
/// `check` never returns false for an added item; it may return true for an
/// item that was never added. Items cannot be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipFilter {
    words: Vec<u64>,
    num_bits: usize,
    num_hashes: u32,
}

impl MembershipFilter {
    /// Empty filter; zero bits or zero hashes are raised to one
    pub fn new(params: FilterParams) -> Self {
        let num_bits = params.bits.max(1);
        Self {
            words: vec![0; num_bits.div_ceil(64)],
            num_bits,
            num_hashes: params.hashes.max(1),
        }
    }

    /// Filter holding every skill of every freelancer
    pub fn from_freelancers(params: FilterParams, freelancers: &[Freelancer]) -> Self {
        let mut filter = Self::new(params);
        for skill in freelancers.iter().flat_map(|f| f.skills.iter()) {
            filter.add(skill);
        }
        filter
    }

    pub fn add(&mut self, item: &str) {
        for position in self.positions(item) {
            self.words[position / 64] |= 1u64 << (position % 64);
        }
    }

    pub fn check(&self, item: &str) -> bool {
        self.positions(item)
            .all(|position| self.words[position / 64] & (1u64 << (position % 64)) != 0)
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub fn set_bits(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Share of bits set, 0.0 to 1.0
    pub fn fill_ratio(&self) -> f64 {
        self.set_bits() as f64 / self.num_bits as f64
    }

    /// Probability that an item never added still passes `check`
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.num_hashes as i32)
    }

    fn positions<'a>(&self, item: &'a str) -> impl Iterator<Item = usize> + 'a {
        let bytes = item.as_bytes();
        let h1 = fmix32(djb2(bytes));
        let h2 = fmix32(sdbm(bytes));
        let h3 = fmix32(fnv1a(bytes));
        let num_bits = self.num_bits as u64;

        (0..self.num_hashes).map(move |i| {
            let hash = match i {
                0 => h1,
                1 => h2,
                2 => h3,
                // Double hashing for any function past the third
                _ => h1.wrapping_add(i.wrapping_mul(h2)),
            };
            (u64::from(hash) % num_bits) as usize
        })
    }
}

#[inline]
fn djb2(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(5381u32, |h, &c| h.wrapping_shl(5).wrapping_add(h).wrapping_add(u32::from(c)))
}

#[inline]
fn sdbm(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |h, &c| {
        u32::from(c)
            .wrapping_add(h.wrapping_shl(6))
            .wrapping_add(h.wrapping_shl(16))
            .wrapping_sub(h)
    })
}

#[inline]
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0x811c_9dc5u32, |h, &c| (h ^ u32::from(c)).wrapping_mul(0x0100_0193))
}

/// Murmur3 finalizer, spreads similar inputs over the whole range
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Service-owned skill filter with a one-time build
///
/// The first successful `build` publishes the filter; every later call
/// returns the published filter untouched, even when called concurrently
/// or with different data.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    params: FilterParams,
    filter: OnceLock<MembershipFilter>,
}

impl SkillRegistry {
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            filter: OnceLock::new(),
        }
    }

    /// Populate the filter from the freelancer pool unless already built
    pub fn build(&self, freelancers: &[Freelancer]) -> &MembershipFilter {
        self.filter.get_or_init(|| {
            let filter = MembershipFilter::from_freelancers(self.params, freelancers);
            tracing::info!(
                "Skill filter built from {} freelancers ({} of {} bits set, est. false positive rate {:.4})",
                freelancers.len(),
                filter.set_bits(),
                filter.num_bits(),
                filter.estimated_false_positive_rate()
            );
            filter
        })
    }

    /// Build lazily, loading the freelancer pool only when nothing is published yet
    pub fn build_with<E, F>(&self, load: F) -> Result<&MembershipFilter, E>
    where
        F: FnOnce() -> Result<Vec<Freelancer>, E>,
    {
        if let Some(filter) = self.filter.get() {
            return Ok(filter);
        }
        let freelancers = load()?;
        Ok(self.build(&freelancers))
    }

    pub fn is_built(&self) -> bool {
        self.filter.get().is_some()
    }

    pub fn filter(&self) -> Option<&MembershipFilter> {
        self.filter.get()
    }

    /// False when the skill was never added (modulo false positives) or when
    /// the filter has not been built yet
    pub fn possibly_exists(&self, skill: &str) -> bool {
        self.filter.get().is_some_and(|filter| filter.check(skill))
    }
}
