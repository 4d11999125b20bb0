const EXAMPLE: &str = "\
[name]
example reaction

[reactants]
# required: at least two reacting molecules, at most four
# molID   molName   atomName   atomID
  1       MOL       CM         1
  1       MOL       HM         2
  1       MOL       HM         3
  1       MOL       HM         4

  2       MOL       CM         1
  2       MOL       HM         2
  2       MOL       HM         3
  2       MOL       HM         4

[products]
# required: at least one product molecule
# each product atom names the reactant atom it is made from
# molID   molName   atomName   atomID   from molID   from atomID
  1       NEW       CE         1        1            1
  1       NEW       HE         2        1            2
  1       NEW       HE         3        1            3
  1       NEW       HE         4        1            4
  1       NEW       CE         5        2            1
  1       NEW       HE         6        2            2
  1       NEW       HE         7        2            3
  1       NEW       HE         8        2            4

[criteria]
# one criterion per line: type (dist, ang or dih), the reactant atoms it is
# measured on, then the accepted range; angles are in degrees
# type   molID atomID   molID atomID   minValue   maxValue
  dist   1     1        2     1        0.0        0.5
# type   molID atomID   molID atomID   molID atomID   minValue   maxValue
  ang    1     2        1     1        2     1        110        150
# type   molID atomID   molID atomID   molID atomID   molID atomID   minValue   maxValue
  dih    1     2        1     1        2     1        2     2        -20        20

[translations]
# optional: move a product atom along the axis towards another product atom
# positive values move it closer, negative values move it away
# molID   atomID   molID   atomID   value
  1       1        1       5        0.05

[energy]
# optional: reaction energy correction
  -66.0

[activation]
# optional: activation energy
  10.0

[rate]
# rate table over the value of the first criterion
# the rate of the last row whose distance does not exceed the value applies
# distance   rate
  0.35       0.2
  0.40       0.06
  0.50       0.04

# notes:
# - '#' starts a comment, empty lines are ignored
# - columns are separated by white space
# - units are those of the MD engine
# - reactant atoms are numbered consecutively, in the order and with the
#   names of the molecule in the MD topology
";

/// An annotated reaction file covering every directive.
pub fn example_reaction_file() -> &'static str {
    EXAMPLE
}
