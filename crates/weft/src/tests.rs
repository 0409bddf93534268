//! Cross-module scenarios that drive a scanner, a basket and a graph
//! together.

use crate::*;
use pretty_assertions::assert_eq;

fn seg(info: &str, from: usize, to: usize) -> Segment {
    Segment::new(info, Token::new(Marker(from), Marker(to)))
}

#[test]
fn picked_rules_build_a_flame_stack() {
    // item: '[' item* ']' | number
    let item = Rule::named("item");
    let number = Rule::named("number");
    number.set(many(digit()));
    item.set(any!(seq!('[', zom(&item), ']'), &number));

    let mut sca = Scanner::new("[12[3]]");
    let basket = sca.new_basket();
    item.pick(&basket);
    number.pick(&basket);

    assert!(sca.use_reader(&item).is_ok());
    assert!(sca.at_end());

    let graph = build_graph("S", basket.picked());
    assert_eq!(
        graph.flame_stack(),
        "S 7\n\
         S;item 7\n\
         S;item;item 2\n\
         S;item;item;number 2\n\
         S;item;item 3\n\
         S;item;item;item 1\n\
         S;item;item;item;number 1\n"
    );
}

#[test]
fn backtracked_branches_leave_no_segments() {
    let number = Rule::named("number");
    number.set(many(digit()));

    let mut sca = Scanner::new("1,2,3;");
    let basket = sca.new_basket();
    number.pick(&basket);

    // the first branch consumes all three numbers before failing on the
    // terminator
    let reader = any!(
        seq!(&number, ',', &number, ',', &number, '!'),
        seq!(&number, ',', &number, ';')
    );
    assert!(sca.use_reader(&*reader).is_err());
    assert!(basket.picked().is_empty());

    let reader = any!(
        seq!(&number, ',', &number, ',', &number, '!'),
        seq!(&number, ',', &number, ',', &number, ';')
    );
    assert!(sca.use_reader(&*reader).is_ok());
    assert_eq!(
        basket.picked(),
        vec![seg("number", 0, 1), seg("number", 2, 3), seg("number", 4, 5)]
    );
}

#[test]
fn any_reports_the_deepest_branch() {
    let reader = any!(
        seq!("let ", many(digit())),
        seq!("let x = ", many(digit())),
        seq!("le", many(digit()))
    );
    let mut sca = Scanner::new("let x = y");
    let err = sca.use_reader(&*reader).unwrap_err();
    assert_eq!(err.marker, Marker(8));
    assert_eq!(sca.tail(), "let x = y");
}

#[test]
fn to_and_past_are_duals() {
    let inp = "header; body";
    let mut to_sca = Scanner::new(inp);
    let mut past_sca = Scanner::new(inp);
    assert!(to_sca.use_reader(&*to(lit("; "))).is_ok());
    assert!(past_sca.use_reader(&*past(lit("; "))).is_ok());
    assert_eq!(past_sca.mark().0 - to_sca.mark().0, "; ".len());
}

#[test]
fn janus_round_trip_equals_literal_match() {
    // wherever Seq(begin, Lit(q)) succeeds for the consumed q, Seq(begin,
    // end) succeeds as well
    let inp = "==x==";
    let (begin, end) = janus("c", many(lit("=")));
    let with_end = seq!(begin, 'x', end);
    let mut sca = Scanner::new(inp);
    assert!(sca.use_reader(&*with_end).is_ok());
    assert!(sca.at_end());

    let (begin, _) = janus("c", many(lit("=")));
    let with_lit = seq!(begin, 'x', lit("=="));
    let mut sca = Scanner::new(inp);
    assert!(sca.use_reader(&*with_lit).is_ok());
    assert!(sca.at_end());
}

#[test]
fn long_bracket_strings_via_janus() {
    let (begin, end) = janus("level", zom(lit("=")));
    let long_string = seq!(
        lit("["),
        begin,
        lit("["),
        past(seq!(lit("]"), end, lit("]")))
    );

    for inp in ["[[plain]]", "[=[a]b]=]", "[==[hi]==]", "[=[ ]] ]=]"] {
        let mut sca = Scanner::new(inp);
        assert!(sca.use_reader(&*long_string).is_ok(), "input {:?}", inp);
        assert!(sca.at_end(), "input {:?}", inp);
    }

    let mut sca = Scanner::new("[=[hi]==]x");
    assert!(sca.use_reader(&*long_string).is_err());
    assert_eq!(sca.tail(), "[=[hi]==]x");
}

#[test]
fn line_col_scenario() {
    let mut sca = Scanner::new("\nabcd\n\n\tefgh\n\n");
    assert!(sca.move_by(8));
    assert_eq!(sca.line_col(4), (4, 5));
}

#[test]
fn int_and_bool_scenarios() {
    let mut sca = Scanner::new("-2147483649");
    assert_eq!(sca.read_int(10, 32), Ok(-214748364));
    assert_eq!(sca.tail(), "9");

    let mut sca = Scanner::new("TRUE rest");
    assert_eq!(sca.read_bool("*"), Ok(true));
    assert_eq!(sca.tail(), " rest");

    let mut sca = Scanner::new("TRUE rest");
    assert!(sca.read_bool("l").is_err());
    assert_eq!(sca.tail(), "TRUE rest");
}

#[test]
fn graph_rejects_clashing_segment() {
    let mut graph = build_graph(
        "S5",
        vec![
            seg("text", 0, 20),
            seg("obj", 2, 18),
            seg("id", 3, 8),
            seg("val", 10, 16),
        ],
    );
    let before = graph.clone();
    assert!(!graph.append(seg("bad", 8, 20)));
    assert_eq!(graph, before);
}

#[test]
fn monitored_grammar_traces_rules() {
    struct ListGrammar {
        list: Rule,
        number: Rule,
    }

    impl Grammar for ListGrammar {
        fn rules(&self) -> Vec<Rule> {
            vec![self.list.clone(), self.number.clone()]
        }
    }

    let g = ListGrammar {
        list: Rule::named("list"),
        number: Rule::named("number"),
    };
    g.number.set(many(digit()));
    g.list.set(seq!('[', &g.number, zom(seq!(',', &g.number)), ']'));
    assert!(check_rules(&g).is_ok());

    let log = monitor_grammar(&g);
    let mut sca = Scanner::new("[7,85]");
    assert!(sca.use_reader(&g.list).is_ok());

    assert_eq!(
        log.lines(),
        vec!["1.@ 0 list", "2..@ 1 number", "2..@ 3 number"]
    );
    assert_eq!(
        log.lines_with_preview("[7,85]", 2)[2],
        "2..@ 3 number > \"85\""
    );
}
