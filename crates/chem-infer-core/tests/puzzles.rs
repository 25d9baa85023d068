//! End-to-end puzzles against the standard inventory.

use chem_infer_core::{KnowledgeBase, Letter, PuzzleGraph, SolveReport, Solver, SolverConfig};
use std::sync::OnceLock;

fn standard() -> &'static KnowledgeBase {
    static KB: OnceLock<KnowledgeBase> = OnceLock::new();
    KB.get_or_init(|| KnowledgeBase::standard().unwrap())
}

fn run(puzzle: &str, config: SolverConfig) -> SolveReport {
    let mut graph = PuzzleGraph::new(standard());
    assert_eq!(graph.input_all(puzzle), 0, "unparsed lines in {puzzle:?}");
    Solver::with_config(config).solve(&mut graph).unwrap()
}

/// Solutions rendered as sorted `A:F,B:G` strings.
fn render(report: &SolveReport) -> Vec<String> {
    let mut v: Vec<String> = report
        .solutions
        .iter()
        .map(|s| {
            s.iter()
                .map(|(l, f)| format!("{l}:{f}"))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    v.sort();
    v
}

fn solve(puzzle: &str) -> Vec<String> {
    render(&run(puzzle, SolverConfig::default()))
}

fn letter(c: char) -> Letter {
    Letter::from_char(c).unwrap()
}

#[test]
fn test_iron_burns_to_magnetite() {
    let mut graph = PuzzleGraph::new(standard());
    assert_eq!(graph.input_all("a+b=c\na:Fe\nb:O2"), 0);
    let report = Solver::new().solve(&mut graph).unwrap();
    assert!(report.is_unique());
    let s = &report.solutions[0];
    assert_eq!(s[&letter('a')], "Fe");
    assert_eq!(s[&letter('b')], "O2");
    assert_eq!(s[&letter('c')], "Fe3O4");
}

#[test]
fn test_unbalanced_bracket_is_a_miss_without_effect() {
    let mut graph = PuzzleGraph::new(standard());
    assert!(graph.input("[ab(O)").is_err());
    assert_eq!(graph.misses(), 1);
    assert!(graph.is_empty());
    assert_eq!(graph.letters().count(), 0);
}

#[test]
fn test_carbonate_and_salt() {
    let puzzle = "a+b=d+e
b+c=e+f
d>f<g<f
e:NaCl
f:[CO2,CO]
g:[CO2,CO]
d:CaCO3";
    assert_eq!(
        solve(puzzle),
        vec!["A:CaCl2,B:Na2CO3,C:HCl,D:CaCO3,E:NaCl,F:CO2,G:CO"]
    );
}

#[test]
fn test_reduction_cycle() {
    let puzzle = "g-d>a<b>c<f-i<h-g
d-b-f>h<d
b>e>h
d>e>f
b:[Cu,Fe2O3]
[ghef](1)
[adbci](O)";
    assert_eq!(
        solve(puzzle),
        vec!["A:CO2,B:Fe2O3,C:H2O,D:CO,E:Fe,F:H2,G:O2,H:Cu,I:CuO"]
    );
}

#[test]
fn test_acid_and_base() {
    let puzzle = "a-e>d-f>c<b=a
e-b
e>c
c=d
e:HCl
B:NaOH
f:Fe2O3";
    assert_eq!(
        solve(puzzle),
        vec!["A:Na2CO3,B:NaOH,C:H2O,D:H2,E:HCl,F:Fe2O3"]
    );
}

#[test]
fn test_element_subset_ring() {
    let puzzle = "d=h=g-a>b-c>d-e-f>a
[abcdefgh]{HCONaSCu}
[agh](O)
E:[H2SO4,HNO3,HCl]";
    assert_eq!(
        solve(puzzle),
        vec!["A:CuO,B:CuSO4,C:NaOH,D:Na2CO3,E:H2SO4,F:Cu(OH)2,G:CO,H:CO2"]
    );
}

#[test]
fn test_metal_series_has_four_answers() {
    let puzzle = "b+d=e
a+e=f
a+b=c
c+d=f
[def](1)
c:[CuSO4,Ca(OH)2]
b:H2SO4
a:[Fe,C,CuO,MnO2,Fe3O4]";
    let report = run(puzzle, SolverConfig::default());
    assert_eq!(
        render(&report),
        vec![
            "A:CuO,B:H2SO4,C:CuSO4,D:Al,E:H2,F:Cu",
            "A:CuO,B:H2SO4,C:CuSO4,D:Fe,E:H2,F:Cu",
            "A:CuO,B:H2SO4,C:CuSO4,D:Mg,E:H2,F:Cu",
            "A:CuO,B:H2SO4,C:CuSO4,D:Zn,E:H2,F:Cu",
        ]
    );

    let settled = report.settled();
    let settled: Vec<char> = settled.keys().map(|l| l.as_char()).collect();
    assert_eq!(settled, vec!['A', 'B', 'C', 'E', 'F']);
}

#[test]
fn test_limewater_two_answers() {
    let puzzle = "c<a>b
b=c>e=d>b
c-d-f-e
[abcdef](2-3)
b:H2O
f:HCl
d:Na2CO3";
    assert_eq!(
        solve(puzzle),
        vec![
            "A:Ba(OH)2,B:H2O,C:Ca(OH)2,D:Na2CO3,E:NaOH,F:HCl",
            "A:CaO,B:H2O,C:Ca(OH)2,D:Na2CO3,E:NaOH,F:HCl",
        ]
    );
}

#[test]
fn test_oxides_around_hydrochloric_acid() {
    let puzzle = "f-e-a-d-c=b<a>g=f
g:H2
a:HCl
[bcdef](O)";
    assert_eq!(
        solve(puzzle),
        vec![
            "A:HCl,B:CO2,C:CO,D:CuO,E:CaO,F:H2O,G:H2",
            "A:HCl,B:CO2,C:CO,D:Fe2O3,E:CaO,F:H2O,G:H2",
        ]
    );
}

#[test]
fn test_three_reactants_permute() {
    let report = run("a+b+c=d\n[abc]{CaHCO}", SolverConfig::default());
    let solutions = render(&report);
    assert_eq!(solutions.len(), 6);
    for s in &solutions {
        assert!(s.ends_with("D:Ca(HCO3)2"), "{s}");
    }
    assert_eq!(report.settled().len(), 1);
}

#[test]
fn test_loose_puzzle_lists_every_pair() {
    assert_eq!(
        solve("c>a\nc-a"),
        vec![
            "A:CO,C:O2",
            "A:CO2,C:C",
            "A:CO2,C:CaCO3",
            "A:CO2,C:Na2CO3",
            "A:CaCO3,C:CO2",
            "A:H2O,C:CO2",
            "A:H2O,C:CaCO3",
            "A:H2O,C:CaO",
            "A:H2O,C:Na2CO3",
            "A:H2O,C:O2",
            "A:Na2CO3,C:CO2",
            "A:O2,C:H2O",
        ]
    );
}

#[test]
fn test_hydroxide_or_carbonate() {
    let puzzle = "c+e=f
e+d=g
f>h-e
g>i-e
c>a>b>d
e:H2SO4
c:Fe2O3
b:Cu
[g][Cu]
[cd](O)
[ab](1)
[f][Fe]
[h][HICu]";
    assert_eq!(
        solve(puzzle),
        vec![
            "A:Fe,B:Cu,C:Fe2O3,D:CuO,E:H2SO4,F:Fe2(SO4)3,G:CuSO4,H:Fe(OH)3,I:Cu(OH)2",
            "A:Fe,B:Cu,C:Fe2O3,D:CuO,E:H2SO4,F:Fe2(SO4)3,G:CuSO4,H:Fe(OH)3,I:CuCO3",
        ]
    );
}

#[test]
fn test_propagation_preserves_solutions() {
    let puzzles = [
        "a+b=d+e\nb+c=e+f\nd>f<g<f\ne:NaCl\nf:[CO2,CO]\ng:[CO2,CO]\nd:CaCO3",
        "c<a>b\nb=c>e=d>b\nc-d-f-e\n[abcdef](2-3)\nb:H2O\nf:HCl\nd:Na2CO3",
        "a+b+c=d\n[abc]{CaHCO}",
        "c>a\nc-a",
    ];
    let off = SolverConfig {
        propagate: false,
        ..SolverConfig::default()
    };
    for puzzle in puzzles {
        let with = run(puzzle, SolverConfig::default());
        let without = run(puzzle, off);
        assert_eq!(render(&with), render(&without), "{puzzle}");
        assert!(with.stats.propagation_work > 0);
        assert_eq!(without.stats.propagation_work, 0);
    }
}

#[test]
fn test_no_formula_used_twice() {
    let report = run("a:C\na>b\nb>c\nc>d", SolverConfig::default());
    assert!(!report.solutions.is_empty());
    for s in &report.solutions {
        let mut formulas: Vec<&String> = s.values().collect();
        formulas.sort();
        formulas.dedup();
        assert_eq!(formulas.len(), s.len());
    }
}

#[test]
fn test_contradiction_has_no_solutions() {
    let report = run("a:Cu\nb:Fe\na>b", SolverConfig::default());
    assert!(report.solutions.is_empty());
    assert!(report.settled().is_empty());
}

#[test]
fn test_search_budget_is_reported() {
    let mut graph = PuzzleGraph::new(standard());
    graph.input_all("a>b\nb>c\nc>d\nd-e");
    let solver = Solver::with_config(SolverConfig {
        propagate: false,
        search_budget: 1_000,
        ..SolverConfig::default()
    });
    let err = solver.solve(&mut graph).unwrap_err();
    assert_eq!(err.to_string(), "search budget of 1000 checks exceeded");
}
