//! Common source fixtures for tests.

/// The smallest useful definition: `f(x)` is a real number
pub const DEFINES_F: &str = "[\\f(x)]\nDefines: f(x)\nmeans: 'f(x) is \\real'\n";

/// `A is B`, `B is C`, `C`
pub const TYPE_CHAIN: &str = r#"[\A]
Defines: A
means: 'A is \B'

[\B]
Defines: B
means: 'B is \C'

[\C]
Defines: C
means: 'C'
"#;

/// `A` viewable as `B` and `B` viewable as `A`
pub const VIEW_CYCLE: &str = r#"[\A]
Defines: A
means: 'A'
providing:
. view:
  as: '\B'

[\B]
Defines: B
means: 'B'
providing:
. view:
  as: '\A'
"#;

/// One of every top-level construct
pub const EVERY_CONSTRUCT: &str = r#"::Notes about sets::

[\set]
Foundation: X
means: 'X is \collection'

[\subset(A, B)]
Defines: s(A, B)
given: x
when: 'A is \set', 'B is \set'
means:
. forAll: x
  where: 'x in A'
  then: 'x in B'
providing:
. view:
  as: '\relation'
  via: 'R := A'
. symbols: a
  where: 'a := A'
using: 'n := 1'
written: "A subset B"
called: "subset"
Metadata:
. id: "subset"
. tags: "sets", "relations"

[\positive]
States:
when: 'x > 0'
then: 'x is \positive'
else: 'x <= 0'
written: "positive"

[\natural.to.real]
Views:
from: '\natural'
to: '\real'

[\abs(x)]
Evaluates:
when: 'x < 0'
then: '-x'
else: 'x'

Axiom: "Extensionality"
given: A, B
then:
. iff: 'A = B'
  then:
  . forAll: x
    then:
    . equivalently: 'x in A', 'x in B'

[\thm.one]
Theorem: "First"
given: n
where: 'n is \natural'
then:
. or: 'n = 0', 'n > 0'
. not: 'n < 0'
Proof: "By cases"

Conjecture:
then:
. exists: p
  suchThat: 'p > n'
. existsUnique: q
. piecewise:
  when: 'q > 0'
  then: 'q'
  else: '0'

[@book]
Resource:
. type: "book"
. author: "Ann Author", "Bob Author"
. year: "2001"

[sets]
Topic: "Sets"
content: "Collections of objects"

Note:
content: "A remark"
Metadata:
. related: "sets"

Specify:
. zero:
  is: '\natural'
. negativeFloat:
  is: '\real'
"#;

/// Three broken definitions (no `means`) around a valid note
pub const THREE_BROKEN: &str = r#"[\a]
Defines: a

[\b]
Defines: b

Note:
content: "fine"

[\c]
Defines: c
"#;
