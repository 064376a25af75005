use anyhow::{Context, Result};

/// Approximate resident population per state (2020 census, rounded).
const STATES: [(&str, u64); 51] = [
    ("Alabama", 5_024_000),
    ("Alaska", 733_000),
    ("Arizona", 7_152_000),
    ("Arkansas", 3_012_000),
    ("California", 39_538_000),
    ("Colorado", 5_774_000),
    ("Connecticut", 3_606_000),
    ("Delaware", 990_000),
    ("District of Columbia", 690_000),
    ("Florida", 21_538_000),
    ("Georgia", 10_712_000),
    ("Hawaii", 1_455_000),
    ("Idaho", 1_839_000),
    ("Illinois", 12_813_000),
    ("Indiana", 6_786_000),
    ("Iowa", 3_190_000),
    ("Kansas", 2_938_000),
    ("Kentucky", 4_506_000),
    ("Louisiana", 4_658_000),
    ("Maine", 1_362_000),
    ("Maryland", 6_177_000),
    ("Massachusetts", 7_030_000),
    ("Michigan", 10_077_000),
    ("Minnesota", 5_706_000),
    ("Mississippi", 2_961_000),
    ("Missouri", 6_155_000),
    ("Montana", 1_084_000),
    ("Nebraska", 1_962_000),
    ("Nevada", 3_105_000),
    ("New Hampshire", 1_377_000),
    ("New Jersey", 9_289_000),
    ("New Mexico", 2_118_000),
    ("New York", 20_201_000),
    ("North Carolina", 10_439_000),
    ("North Dakota", 779_000),
    ("Ohio", 11_799_000),
    ("Oklahoma", 3_959_000),
    ("Oregon", 4_237_000),
    ("Pennsylvania", 13_003_000),
    ("Rhode Island", 1_097_000),
    ("South Carolina", 5_118_000),
    ("South Dakota", 887_000),
    ("Tennessee", 6_911_000),
    ("Texas", 29_146_000),
    ("Utah", 3_272_000),
    ("Vermont", 643_000),
    ("Virginia", 8_631_000),
    ("Washington", 7_705_000),
    ("West Virginia", 1_794_000),
    ("Wisconsin", 5_894_000),
    ("Wyoming", 577_000),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "povertymillionaires.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "State",
        "Number in Poverty",
        "Number of Millionaires",
        "State Population",
    ])?;

    for (name, population) in STATES {
        let poverty = population as f64 * rng.uniform(0.07, 0.20);
        let millionaires = population as f64 * rng.uniform(0.004, 0.013);
        writer.write_record([
            name.to_string(),
            format!("{:.0}", poverty),
            format!("{:.0}", millionaires),
            population.to_string(),
        ])?;
    }

    writer.flush().context("flushing CSV")?;

    println!("Wrote {} states to {output_path}", STATES.len());
    Ok(())
}
