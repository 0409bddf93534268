use weft::{
    any, any_rune, between, digit, hex_digit, holey, lit, many, opt, rune, seq, times, zom,
    Grammar, ReadError, Reader, Rule, Scanner,
};

/// The JSON grammar, rule for rule in McKeeman form.
///
/// See: https://www.crockford.com/mckeeman.html
pub struct JsonGrammar {
    pub value: Rule,
    pub object: Rule,
    pub members: Rule,
    pub member: Rule,
    pub array: Rule,
    pub elements: Rule,
    pub element: Rule,
    pub string: Rule,
    pub characters: Rule,
    pub character: Rule,
    pub escape: Rule,
    pub hex: Rule,
    pub number: Rule,
    pub integer: Rule,
    pub fraction: Rule,
    pub exponent: Rule,
    pub onenine: Rule,
    pub digit: Rule,
    pub digits: Rule,
    pub sign: Rule,
    pub boolean: Rule,
    pub null: Rule,
    pub ws: Rule,
}

/// Create a grammar that reads a JSON document.
pub fn json() -> JsonGrammar {
    let g = JsonGrammar {
        value: Rule::named("value"),
        object: Rule::named("object"),
        members: Rule::named("members"),
        member: Rule::named("member"),
        array: Rule::named("array"),
        elements: Rule::named("elements"),
        element: Rule::named("element"),
        string: Rule::named("string"),
        characters: Rule::named("characters"),
        character: Rule::named("character"),
        escape: Rule::named("escape"),
        hex: Rule::named("hex"),
        number: Rule::named("number"),
        integer: Rule::named("integer"),
        fraction: Rule::named("fraction"),
        exponent: Rule::named("exponent"),
        onenine: Rule::named("onenine"),
        digit: Rule::named("digit"),
        digits: Rule::named("digits"),
        sign: Rule::named("sign"),
        boolean: Rule::named("bool"),
        null: Rule::named("null"),
        ws: Rule::named("ws"),
    };
    g.ws.set(zom(weft::ws()));
    g.sign.set(opt(any_rune("+-")));
    g.onenine.set(between('1', '9'));
    g.digit.set(digit());
    g.digits.set(many(digit()));
    g.exponent.set(opt(seq!(any_rune("eE"), &g.sign, &g.digits)));
    g.fraction.set(opt(seq!(rune('.'), &g.digits)));
    g.integer.set(seq!(
        opt(rune('-')),
        any!(rune('0'), seq!(&g.onenine, opt(&g.digits)))
    ));
    g.number.set(seq!(&g.integer, &g.fraction, &g.exponent));
    g.hex.set(hex_digit());
    g.escape
        .set(any!(any_rune("\"\\/bfnrt"), seq!(rune('u'), times(4, &g.hex))));
    g.character.set(any!(
        holey(' ', char::MAX, "\"\\"),
        seq!(rune('\\'), &g.escape)
    ));
    g.characters.set(zom(&g.character));
    g.string.set(seq!(rune('"'), &g.characters, rune('"')));
    g.boolean.set(any!(lit("true"), lit("false")));
    g.null.set(lit("null"));
    g.element.set(seq!(&g.ws, &g.value, &g.ws));
    g.elements
        .set(seq!(&g.element, zom(seq!(rune(','), &g.element))));
    g.array
        .set(seq!(rune('['), any!(&g.elements, &g.ws), rune(']')));
    g.member
        .set(seq!(&g.ws, &g.string, &g.ws, rune(':'), &g.element));
    g.members
        .set(seq!(&g.member, zom(seq!(rune(','), &g.member))));
    g.object
        .set(seq!(rune('{'), any!(&g.members, &g.ws), rune('}')));
    g.value.set(any!(
        &g.object,
        &g.array,
        &g.string,
        &g.number,
        &g.boolean,
        &g.null
    ));
    g
}

impl Reader for JsonGrammar {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        self.element.read(sca)
    }

    fn what(&self) -> String {
        "json".to_string()
    }
}

impl Grammar for JsonGrammar {
    fn rules(&self) -> Vec<Rule> {
        vec![
            self.value.clone(),
            self.object.clone(),
            self.members.clone(),
            self.member.clone(),
            self.array.clone(),
            self.elements.clone(),
            self.element.clone(),
            self.string.clone(),
            self.characters.clone(),
            self.character.clone(),
            self.escape.clone(),
            self.hex.clone(),
            self.number.clone(),
            self.integer.clone(),
            self.fraction.clone(),
            self.exponent.clone(),
            self.onenine.clone(),
            self.digit.clone(),
            self.digits.clone(),
            self.sign.clone(),
            self.boolean.clone(),
            self.null.clone(),
            self.ws.clone(),
        ]
    }
}
