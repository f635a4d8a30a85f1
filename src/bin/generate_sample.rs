use anyhow::{Context, Result};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Shape of one synthetic group: how genome size, GC, and gene count are
/// distributed, and which header names the file uses.
struct GroupProfile {
    file: &'static str,
    header: [&'static str; 5],
    rows: usize,
    /// Mean and std of log10(genome size in Mb).
    log_size: (f64, f64),
    gc: (f64, f64),
    /// Genes per Mb.
    gene_density: f64,
    names: &'static [&'static str],
    fifth_column: &'static [&'static str],
}

const GROUPS: [GroupProfile; 3] = [
    GroupProfile {
        file: "viruses.csv",
        header: ["#Organism Name", "Size(Mb)", "GC%", "CDS", "Host"],
        rows: 150,
        log_size: (-1.5, 0.5),
        gc: (45.0, 7.0),
        gene_density: 1200.0,
        names: &["Phage", "Adenovirus", "Herpesvirus", "Coronavirus", "Poxvirus"],
        fifth_column: &["bacteria", "human", "vertebrates", "plants", "insects"],
    },
    GroupProfile {
        file: "prokaryotes.csv",
        header: ["Organism Name", "Size", "GC content", "Genes", "Organism Groups"],
        rows: 200,
        log_size: (0.55, 0.2),
        gc: (52.0, 11.0),
        gene_density: 900.0,
        names: &["Escherichia", "Bacillus", "Streptomyces", "Mycoplasma", "Sulfolobus"],
        fifth_column: &[
            "Bacteria;Proteobacteria",
            "Bacteria;Firmicutes",
            "Bacteria;Actinobacteria",
            "Archaea;Crenarchaeota",
        ],
    },
    GroupProfile {
        file: "eukaryotes.csv",
        header: ["Name", "GenomeSize(Mb)", "GC_content", "GeneCount", "Taxon"],
        rows: 120,
        log_size: (2.3, 0.7),
        gc: (41.0, 5.0),
        gene_density: 60.0,
        names: &["Saccharomyces", "Arabidopsis", "Drosophila", "Danio", "Plasmodium"],
        fifth_column: &["Fungi", "Plants", "Animals", "Protists"],
    },
];

fn write_group(profile: &GroupProfile, rng: &mut SimpleRng) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(profile.file).with_context(|| format!("creating {}", profile.file))?;
    writer.write_record(profile.header)?;

    for i in 0..profile.rows {
        let size = 10f64.powf(rng.gauss(profile.log_size.0, profile.log_size.1));
        let gc = rng.gauss(profile.gc.0, profile.gc.1).clamp(15.0, 80.0);
        let genes = (size * profile.gene_density * rng.gauss(1.0, 0.1).max(0.5)).round();

        // Roughly one row in twenty carries unparsable or blank values.
        let size_cell = if i % 23 == 7 { "N/A".to_string() } else { format!("{size:.4}") };
        let gc_cell = if i % 29 == 11 { String::new() } else { format!("{gc:.2}") };
        let genes_cell = if i % 17 == 3 { "-".to_string() } else { format!("{genes}") };

        let name = format!("{} sp. {}", rng.pick(profile.names), i + 1);
        writer.write_record([
            name.as_str(),
            size_cell.as_str(),
            gc_cell.as_str(),
            genes_cell.as_str(),
            rng.pick(profile.fifth_column),
        ])?;
    }
    writer.flush()?;
    Ok(profile.rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    for profile in &GROUPS {
        let rows = write_group(profile, &mut rng)?;
        println!("Wrote {rows} rows to {}", profile.file);
    }
    Ok(())
}
