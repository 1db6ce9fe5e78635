mod test_support;

use test_support::{login, request, request_json, spawn_server, temp_dir};

#[test]
fn grading_flow_produces_text_report() {
    let data = temp_dir("rosterd-grading");
    let server = spawn_server(&data);
    let mut conn = server.connect();
    login(&mut conn);

    assert_eq!(request(&mut conn, "cadastrar_turma;Math"), "✅ Turma cadastrada.");
    assert_eq!(request(&mut conn, "cadastrar_aluno;Bob;S1"), "✅ Aluno cadastrado.");
    assert_eq!(
        request(&mut conn, "matricular_aluno_em_turma;1;1"),
        "✅ Matriculado com sucesso."
    );
    assert_eq!(
        request(&mut conn, "cadastrar_atividade;1;Quiz;First quiz"),
        "✅ Atividade cadastrada."
    );
    assert_eq!(
        request(&mut conn, "adicionar_editar_nota;1;1;7,5"),
        "✅ Nota registrada/atualizada."
    );

    let report = request(&mut conn, "gerar_relatorio_texto;1");
    assert!(report.contains("S1 - Bob -> Quiz: 7.5"), "{report}");

    let grades = request_json(&mut conn, "ver_notas_atividade;1");
    assert_eq!(grades[0]["id_aluno"], "1");
    assert_eq!(grades[0]["nota"], 7.5);

    assert_eq!(
        request(&mut conn, "adicionar_editar_nota;1;1;11"),
        "❌ ERRO: Nota deve ser entre 0 e 10."
    );
}

#[test]
fn best_and_worst_student_in_class() {
    let data = temp_dir("rosterd-best-worst");
    let server = spawn_server(&data);
    let mut conn = server.connect();
    login(&mut conn);

    request(&mut conn, "cadastrar_turma;Math");
    request(&mut conn, "cadastrar_aluno;Bob;S1");
    request(&mut conn, "cadastrar_aluno;Eve;S2");
    request(&mut conn, "matricular_aluno_em_turma;1;1");
    request(&mut conn, "matricular_aluno_em_turma;2;1");
    request(&mut conn, "cadastrar_atividade;1;Quiz;");
    request(&mut conn, "cadastrar_atividade;1;Test;");
    request(&mut conn, "adicionar_editar_nota;1;1;9");
    request(&mut conn, "adicionar_editar_nota;2;1;7");
    request(&mut conn, "adicionar_editar_nota;1;2;4");
    request(&mut conn, "adicionar_editar_nota;2;2;6");

    assert_eq!(
        request(&mut conn, "melhor_pior_aluno_turma;1"),
        "Melhor: Bob - Média: 8.00\nPior: Eve - Média: 5.00"
    );
}

#[test]
fn removing_a_student_cascades_to_classes_and_grades() {
    let data = temp_dir("rosterd-cascade");
    let server = spawn_server(&data);
    let mut conn = server.connect();
    login(&mut conn);

    request(&mut conn, "cadastrar_turma;Math");
    request(&mut conn, "cadastrar_aluno;Bob;S1");
    request(&mut conn, "matricular_aluno_em_turma;1;1");
    request(&mut conn, "cadastrar_atividade;1;Quiz;");
    request(&mut conn, "adicionar_editar_nota;1;1;8");

    assert_eq!(request(&mut conn, "remover_aluno;1"), "✅ Aluno removido.");
    let classes = request_json(&mut conn, "listar_turmas");
    assert_eq!(classes[0]["alunos"], 0);
    assert_eq!(
        request(&mut conn, "ver_notas_atividade;1"),
        "Sem notas registradas."
    );

    let turmas = std::fs::read_to_string(data.join("turmas.json")).expect("classes record");
    let turmas: serde_json::Value = serde_json::from_str(&turmas).expect("json");
    assert_eq!(turmas[0]["alunos"], serde_json::json!([]));
}
