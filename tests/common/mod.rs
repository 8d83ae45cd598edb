#![allow(dead_code)]

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

pub const RUN_ID: &str = "191103_D32611_0365_G00DHB5YXX";

pub const SAMPLE_SHEET: &str = "\
[Header]
IEMFileVersion,4,,,,,,,,,
Investigator Name,Knight,,,,,,,,,
Experiment Name,RKL0042,,,,,,,,,
Date,2019-11-03,,,,,,,,,
Workflow,GenerateFASTQ,,,,,,,,,
Application,FASTQ Only,,,,,,,,,
Assay,Metagenomics,,,,,,,,,
Chemistry,Default,,,,,,,,,
,,,,,,,,,,
[Reads],,,,,,,,,,
150,,,,,,,,,,
150,,,,,,,,,,
,,,,,,,,,,
[Settings],,,,,,,,,,
ReverseComplement,0,,,,,,,,,
,,,,,,,,,,
[Data],,,,,,,,,,
Lane,Sample_ID,Sample_Name,Sample_Plate,Sample_Well,I7_Index_ID,index,I5_Index_ID,index2,Sample_Project,Well_Description
1,sample1,sample1,FooBar_666_p1,A1,iTru7_107_07,CCGACTAT,iTru5_01_A,ACCGACAA,Baz,important-sample1
1,sample2,sample2,FooBar_666_p1,A2,iTru7_107_08,CCGACTAT,iTru5_01_A,CTTCGCAA,Baz,important-sample2
3,sample1,sample1,FooBar_666_p1,A3,iTru7_107_09,GCCTTGTT,iTru5_01_A,AACACCAC,Baz,important-sample1
3,sample2,sample2,FooBar_666_p1,A4,iTru7_107_10,AACTTGCC,iTru5_01_A,CGTATCTC,Baz,important-sample2
3,sample31,sample31,FooBar_666_p1,A5,iTru7_107_11,CAATGTGG,iTru5_01_A,GGTACGAA,FooBar_666,important-sample31
3,sample32,sample32,FooBar_666_p1,B6,iTru7_107_12,AAGGCTGA,iTru5_01_A,CGATCGAT,FooBar_666,important-sample32
3,sample34,sample34,FooBar_666_p1,B8,iTru7_107_13,TTACCGAG,iTru5_01_A,AAGACACC,FooBar_666,important-sample34
3,sample44,sample44,Baz_p3,B99,iTru7_107_14,GTCCTAAG,iTru5_01_A,CATCTGCT,Baz,important-sample44
";

pub const READ: &[u8] = b"@read1\nACGTACGTAC\n+\nIIIIIIIIII\n";

pub fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
}

pub fn write_gz(path: &Utf8Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap();
}

/// Writes `<prefix>_R1_001.fastq.gz` and `<prefix>_R2_001.fastq.gz` into `dir`.
pub fn write_pair(dir: &Utf8Path, prefix: &str, content: &[u8]) {
    for read in ["R1", "R2"] {
        write_gz(&dir.join(format!("{prefix}_{read}_001.fastq.gz")), content);
    }
}

/// Lays out a demultiplexed run under `root` and returns the run directory.
///
/// `Baz/atropos_qc` only holds empty files for sample2 in lane 3, and the
/// project root has no sample2 lane 3 pair at all.
pub fn build_run(root: &Utf8Path) -> Utf8PathBuf {
    let run = root.join(RUN_ID);
    let baz = run.join("Baz");
    for prefix in [
        "sample1_S11_L001",
        "sample1_S11_L003",
        "sample2_S10_L001",
        "sample44_S14_L003",
    ] {
        write_pair(&baz, prefix, READ);
    }
    write_pair(&baz.join("atropos_qc"), "sample2_S10_L003", b"");

    let foobar = run.join("FooBar_666");
    for prefix in ["sample31_S13_L003", "sample32_S19_L003", "sample34_S33_L003"] {
        write_pair(&foobar, prefix, READ);
    }

    fs::write(run.join("sample-sheet.csv"), SAMPLE_SHEET).unwrap();
    run
}
