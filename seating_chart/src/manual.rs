/*!

This is the long-form manual for `seating_chart` and `seatchart`.

## Roster file

The roster is a `.csv`, `.xlsx` or `.xls` file. Only the first worksheet is read
for spreadsheets, unless a worksheet name is given. The first row is the header and
must contain the four following columns, in any order. Other columns are ignored.

| 座號 | 姓名   | 組別 | 座位 |
|------|--------|------|------|
| 5    | 王小明 | 2    | 2-3  |
| 12   | 林小華 | 4    | 4-1  |

- `座號` the roster number of the student. It orders the summary.
- `姓名` the name of the student.
- `組別` the team of the student, usually between 1 and 6.
- `座位` the seat, written `<group>-<position>`. Two rows with the same seat: the last one wins.

Rows with an empty cell in one of these columns, or with a seat that does not follow
the `<group>-<position>` format, are skipped.

## Seating chart

The classroom has six groups of six seats, displayed in the order `4 5 6 1 2 3`.
Seats without a student are shown as `空位`.

## Scores

Each student has:
* a bonus (`加分總`), raised and lowered one point at a time, and which may become negative;
* a project grade: `作品` (not scored yet, 0), `A` (100), `B` (90), `C` (80), `D` (70), `E` (60), `假` (absent, 0);
* a project modifier: `無` (none), `+` (+5) or `-` (-5).

The project score is the grade plus the modifier, and the total is the bonus plus the project score.

## Class name

A class name made of a single number is rewritten: `7` becomes `7年班`. When importing,
the class name is guessed from the file name: `7年1班.xlsx` gives `7年1班`, `7-1.csv`
gives `7年1`, `701.xlsx` gives `701`.

## Export

The scores are exported to `<class name>_學生總成績_<YYYY-MM-DD>.xlsx`, with one
sheet `學生總成績` and the columns `班級, 組別, 座號, 姓名, 加分總, 作品分數, 總分`.

```bash
seatchart -i '7年1班.xlsx' --grade 2-3=B --modifier 2-3=+ --plus 2-3=2 -o .
```

*/
