#![allow(dead_code)]

// Sample inputs shared by the integration tests

/// Structural domain assignments, sorted by the CATH code in column 2
pub const DOMAINS_TSV: &str = "ted_domain_id\tfoldseek_cath_code\toverlap_percentage\thmm_id
AF-A0A0A7M1B3-F1-model_v4_TED01\t3.40.50.300\t94.83\t5o8wA01
AF-A0A0A7M1B3-F1-model_v4_TED05\t3.40.50.300\t90.10\t5o8wA05
AF-A0A0A7M1B3-F1-model_v4_TED02\t2.40.30.10\t92.63\t5o8wA02
AF-A0A0A7M1B3-F1-model_v4_TED03\t1.10.10.10\t88.00\t1abcA01
";

/// Expected file for the `3.40.50.300` group when splitting DOMAINS_TSV on column 2
pub const DOMAINS_3_40_EXPECTED: &str = "ted_domain_id\tfoldseek_cath_code\toverlap_percentage\thmm_id
AF-A0A0A7M1B3-F1-model_v4_TED01\t3.40.50.300\t94.83\t5o8wA01
AF-A0A0A7M1B3-F1-model_v4_TED05\t3.40.50.300\t90.10\t5o8wA05
";

/// Group sequence A, A, B, A: the fourth data row is out of order
pub const UNSORTED_TSV: &str = "key\tvalue\nA\t1\nA\t2\nB\t3\nA\t4\n";

/// Key with characters that are stripped from output names
pub const UNSAFE_KEY_TSV: &str = "key\tvalue\n5o8w/A01:test\t1\n";

/// Generate a sorted input with `groups` groups of `rows_per_group` rows
pub fn generate_sorted_input(groups: usize, rows_per_group: usize) -> String {
    let mut result = String::from("group\tindex\tpayload\n");
    for g in 0..groups {
        for r in 0..rows_per_group {
            result.push_str(&format!("g{g:04}\t{r}\tvalue {g}-{r}\n"));
        }
    }
    result
}
